//! Build identity
//!
//! A freshly flashed image must be distinguishable from the image that last
//! seeded the hardware clock. The tag is derived from the compile timestamp,
//! so two builds collide only if they were compiled in the same second.

use std::fmt;

use crate::{CamClockError, CamClockResult, WallClockTime};

/// Compile timestamp in Unix seconds, exported by build.rs
const BUILD_UNIX: &str = env!("CAMCLOCK_BUILD_UNIX");

/// Value a persistent store reports when it has never recorded a build
pub const UNSYNCED_SENTINEL: &str = "default";

/// Opaque tag naming one firmware build
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BuildId(String);

impl BuildId {
    pub fn new(id: impl Into<String>) -> Self {
        BuildId(id.into())
    }

    /// The identity of the running image
    pub fn current() -> Self {
        BuildId(format!("build-{BUILD_UNIX}"))
    }

    /// The never-synced placeholder; never equal to any real build id
    pub fn sentinel() -> Self {
        BuildId(UNSYNCED_SENTINEL.to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Build({})", self.0)
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The moment the running image was compiled
pub fn compile_time() -> CamClockResult<WallClockTime> {
    let secs: i64 = BUILD_UNIX
        .parse()
        .map_err(|_| CamClockError::InvalidTime(format!("bad build timestamp: {BUILD_UNIX}")))?;
    WallClockTime::from_unix(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_differs_from_sentinel() {
        assert_ne!(BuildId::current(), BuildId::sentinel());
    }

    #[test]
    fn test_current_is_stable() {
        assert_eq!(BuildId::current(), BuildId::current());
    }

    #[test]
    fn test_compile_time_parses() {
        // build.rs always writes a plain integer
        assert!(compile_time().is_ok());
    }

    #[test]
    fn test_equality_is_string_equality() {
        assert_eq!(BuildId::new("v1"), BuildId::new("v1"));
        assert_ne!(BuildId::new("v1"), BuildId::new("v2"));
    }
}
