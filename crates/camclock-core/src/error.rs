//! Error types for the camclock firmware

use std::time::Duration;

use thiserror::Error;

/// Firmware-wide errors
///
/// Every failure here is terminal for the current boot cycle; there is no
/// retry logic anywhere. Recovery is an external power cycle or reset, which
/// re-enters the boot decision from scratch.
#[derive(Error, Debug)]
pub enum CamClockError {
    // Hardware errors
    #[error("{peripheral} not detected")]
    HardwareAbsent { peripheral: &'static str },

    #[error("hardware clock error: {0}")]
    Clock(String),

    // Network errors
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("{what} timed out after {after:?}")]
    Timeout { what: &'static str, after: Duration },

    #[error("invalid packet: {0}")]
    InvalidPacket(String),

    // Persistence errors
    #[error("persistent store error: {0}")]
    Store(String),

    // Time errors
    #[error("invalid wall-clock time: {0}")]
    InvalidTime(String),

    // Configuration errors
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for camclock operations
pub type CamClockResult<T> = Result<T, CamClockError>;
