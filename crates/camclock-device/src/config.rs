//! Device configuration

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use camclock_core::{CamClockError, CamClockResult};
use camclock_net::{PLACEHOLDER_IMEI, TIME_ZONE_JST_SECS};

/// Credentials for the DVR's access point
///
/// Association itself is the platform layer's job; the device only carries
/// the credentials to hand over.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
}

/// Device configuration with vendor defaults
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub wifi: WifiCredentials,
    /// Fixed local address of the camera on its own access point
    pub dvr_addr: SocketAddr,
    /// Time authority host:port for setup mode
    pub time_authority: String,
    /// Durable boot-record file
    pub store_path: PathBuf,
    /// Offset from UTC in seconds, sent in the sync payload and applied to
    /// fetched authority time
    pub time_zone_secs: i32,
    pub imei: String,
    pub connect_timeout_ms: u64,
    pub response_timeout_ms: u64,
    pub fetch_timeout_ms: u64,
    /// Display refresh cadence in the run loop
    pub refresh_interval_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            wifi: WifiCredentials::default(),
            dvr_addr: SocketAddr::from(([193, 168, 0, 1], 80)),
            time_authority: "pool.ntp.org:123".to_string(),
            store_path: PathBuf::from("camclock-boot.json"),
            time_zone_secs: TIME_ZONE_JST_SECS,
            imei: PLACEHOLDER_IMEI.to_string(),
            connect_timeout_ms: 5_000,
            response_timeout_ms: 5_000,
            fetch_timeout_ms: 5_000,
            refresh_interval_ms: 300,
        }
    }
}

impl DeviceConfig {
    /// Load from a JSON file; absent keys fall back to the defaults
    pub fn from_file(path: impl AsRef<Path>) -> CamClockResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| CamClockError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| CamClockError::Config(format!("{}: {e}", path.display())))
    }

    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[inline]
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    #[inline]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    #[inline]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_defaults() {
        let config = DeviceConfig::default();
        assert_eq!(config.dvr_addr.to_string(), "193.168.0.1:80");
        assert_eq!(config.time_zone_secs, 32_400);
        assert_eq!(config.imei, "1122334455667788");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = std::env::temp_dir().join(format!(
            "camclock-config-{}.json",
            std::process::id()
        ));
        fs::write(
            &path,
            r#"{"wifi":{"ssid":"dvr-ap","password":"secret"},"time_zone_secs":0}"#,
        )
        .unwrap();

        let config = DeviceConfig::from_file(&path).unwrap();
        assert_eq!(config.wifi.ssid, "dvr-ap");
        assert_eq!(config.time_zone_secs, 0);
        // untouched keys keep vendor defaults
        assert_eq!(config.dvr_addr.to_string(), "193.168.0.1:80");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let missing = std::env::temp_dir().join("camclock-no-such-config.json");
        assert!(matches!(
            DeviceConfig::from_file(&missing),
            Err(CamClockError::Config(_))
        ));
    }
}
