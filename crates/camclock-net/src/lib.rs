//! camclock Net - Network I/O
//!
//! Two one-shot exchanges, both terminal on failure:
//! - SNTP fetch from a time authority (operator setup mode)
//! - time push to the DVR's vendor HTTP endpoint (automatic mode)
//!
//! The original firmware polls these sockets in unbounded busy-wait loops;
//! here every wait is bounded and a timeout is a typed error.

pub mod dvr;
pub mod sntp;
pub mod uptime;

pub use dvr::*;
pub use sntp::*;
pub use uptime::*;
