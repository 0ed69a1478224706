//! Actuator drivers.

pub mod indicators;
