//! Slotwatch library.
//!
//! Exposes the pure-logic modules for integration testing.  The Raspberry Pi
//! GPIO adapter is compiled only with the `rpi` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod sensors;
