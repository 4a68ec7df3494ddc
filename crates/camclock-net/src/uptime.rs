//! Monotonic uptime counter

use std::time::{Duration, Instant};

/// Milliseconds-since-start counter
///
/// Only feeds the `ms` filler field of the DVR payload; it is deliberately
/// not wall-clock sub-second time.
#[derive(Clone, Copy, Debug)]
pub struct Uptime {
    origin: Instant,
}

impl Uptime {
    pub fn new() -> Self {
        Uptime {
            origin: Instant::now(),
        }
    }

    pub fn from_origin(origin: Instant) -> Self {
        Uptime { origin }
    }

    /// Uptime milliseconds modulo one second
    pub fn millis_remainder(&self) -> u32 {
        (self.origin.elapsed().as_millis() % 1000) as u32
    }
}

impl Default for Uptime {
    fn default() -> Self {
        Self::new()
    }
}
