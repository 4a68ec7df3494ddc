//! camclock Device - Boot and run orchestration
//!
//! Wires the clock-sync controller to concrete peripherals and runs the
//! firmware's two phases:
//! 1. Boot: decide whether to re-seed the hardware clock (or fetch network
//!    time in operator setup mode), then push the trusted time to the DVR.
//! 2. Run: periodically read clock and battery and hand a formatted readout
//!    to the status sink.

pub mod config;
pub mod device;
pub mod status;

pub use config::*;
pub use device::*;
pub use status::*;
