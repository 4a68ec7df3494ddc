//! camclock Clock - Boot-time clock synchronization
//!
//! This crate owns the one piece of real decision logic in the firmware:
//! whether the battery-backed hardware clock can be trusted at boot, or has
//! to be re-seeded because a new image was just flashed. It also carries the
//! capability traits the controller is written against (hardware clock,
//! persistent boot store, host time-of-day, network time source) and the
//! store implementations.

pub mod controller;
pub mod session;
pub mod store;
pub mod traits;

pub use controller::*;
pub use session::*;
pub use store::*;
pub use traits::*;
