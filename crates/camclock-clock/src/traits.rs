//! Capability traits the sync controller depends on
//!
//! The controller never reaches into globals; every peripheral it touches is
//! handed in through one of these traits.

use std::future::Future;
use std::time::Instant;

use chrono::TimeDelta;

use camclock_core::{BuildId, CamClockError, CamClockResult, WallClockTime};

/// Battery-backed timekeeping peripheral
///
/// Presence is established when the concrete implementation is constructed;
/// a device whose clock does not answer must not produce a `HardwareClock`.
pub trait HardwareClock {
    fn read(&self) -> CamClockResult<WallClockTime>;
    fn adjust(&mut self, t: WallClockTime) -> CamClockResult<()>;
}

/// Persistent record of the last build that seeded the clock
///
/// Survives power loss. A store that has never recorded anything reports
/// [`BuildId::sentinel`], which compares unequal to every real build id.
pub trait BootStore {
    fn last_synced_build(&self) -> CamClockResult<BuildId>;
    fn record_build(&mut self, build: &BuildId) -> CamClockResult<()>;
}

/// Host time-of-day facility
///
/// The runtime copy of the hardware clock; everything downstream that needs
/// a timestamp (logging, the DVR payload) reads this instead of the I2C bus.
pub trait TimeOfDay {
    fn set(&mut self, t: WallClockTime) -> CamClockResult<()>;
    fn get(&self) -> CamClockResult<WallClockTime>;
}

/// Request/response exchange with a network time authority
pub trait NetworkTimeSource {
    fn fetch(&self) -> impl Future<Output = CamClockResult<WallClockTime>> + Send;
}

/// Process-local [`TimeOfDay`]: the seeded value plus monotonic elapsed time
#[derive(Debug, Default)]
pub struct RuntimeTimeOfDay {
    base: Option<(WallClockTime, Instant)>,
}

impl RuntimeTimeOfDay {
    pub fn new() -> Self {
        RuntimeTimeOfDay { base: None }
    }
}

impl TimeOfDay for RuntimeTimeOfDay {
    fn set(&mut self, t: WallClockTime) -> CamClockResult<()> {
        self.base = Some((t, Instant::now()));
        Ok(())
    }

    fn get(&self) -> CamClockResult<WallClockTime> {
        let (t, anchored) = self
            .base
            .ok_or_else(|| CamClockError::Clock("time of day never seeded".into()))?;
        Ok(t + TimeDelta::seconds(anchored.elapsed().as_secs() as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_unset_is_error() {
        let tod = RuntimeTimeOfDay::new();
        assert!(tod.get().is_err());
    }

    #[test]
    fn test_time_of_day_returns_seeded_value() {
        let mut tod = RuntimeTimeOfDay::new();
        let t = WallClockTime::new(2024, 3, 5, 7, 8, 9).unwrap();
        tod.set(t).unwrap();
        assert_eq!(tod.get().unwrap(), t);
    }
}
