//! Application core: pure domain logic, zero I/O.
//!
//! Threshold decisions, the per-tick polling orchestration, and the shared
//! snapshot.  All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer testable without a Raspberry Pi.

pub mod decision;
pub mod events;
pub mod ports;
pub mod service;
pub mod snapshot;
