//! Wall-clock time for the camclock firmware
//!
//! The hardware clock, the network time source, the display readout and the
//! outbound DVR payload all speak in calendar timestamps, so the shared
//! representation is a calendar type rather than an epoch counter.

use std::fmt;
use std::ops::Add;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc};

use crate::{CamClockError, CamClockResult};

/// A calendar timestamp: year, month, day, hour, minute, second
///
/// Always holds a valid calendar date; construction validates the fields.
/// Sub-second precision does not exist anywhere in the system (the hardware
/// clock ticks in whole seconds), so none is carried.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallClockTime(NaiveDateTime);

impl WallClockTime {
    /// Build from calendar fields, rejecting impossible dates and times
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> CamClockResult<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            CamClockError::InvalidTime(format!(
                "{year:04}-{month:02}-{day:02} is not a calendar date"
            ))
        })?;
        let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
            CamClockError::InvalidTime(format!(
                "{hour:02}:{minute:02}:{second:02} is not a time of day"
            ))
        })?;
        Ok(WallClockTime(NaiveDateTime::new(date, time)))
    }

    #[inline]
    pub fn from_naive(dt: NaiveDateTime) -> Self {
        WallClockTime(dt)
    }

    #[inline]
    pub fn to_naive(self) -> NaiveDateTime {
        self.0
    }

    /// Interpret Unix seconds as a timestamp
    pub fn from_unix(secs: i64) -> CamClockResult<Self> {
        DateTime::<Utc>::from_timestamp(secs, 0)
            .map(|dt| WallClockTime(dt.naive_utc()))
            .ok_or_else(|| {
                CamClockError::InvalidTime(format!("{secs} is out of timestamp range"))
            })
    }

    #[inline]
    pub fn unix_seconds(self) -> i64 {
        self.0.and_utc().timestamp()
    }

    #[inline]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[inline]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    #[inline]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    #[inline]
    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    #[inline]
    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    #[inline]
    pub fn second(self) -> u32 {
        self.0.second()
    }

    /// Vendor wire form: `YYYYMMDDhhmmss`, always 14 digits
    pub fn compact(self) -> String {
        self.0.format("%Y%m%d%H%M%S").to_string()
    }
}

impl Add<TimeDelta> for WallClockTime {
    type Output = WallClockTime;

    #[inline]
    fn add(self, rhs: TimeDelta) -> Self::Output {
        WallClockTime(self.0 + rhs)
    }
}

impl fmt::Debug for WallClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wall({})", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

impl fmt::Display for WallClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y/%m/%d %H:%M:%S"))
    }
}
