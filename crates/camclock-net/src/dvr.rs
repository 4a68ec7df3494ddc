//! DVR time push over the vendor HTTP API
//!
//! One POST to a fixed address on the camera's own access point. The camera
//! never reports anything useful back, so the response is drained and
//! discarded; only establishing the connection is treated as a success
//! signal. No retry, no backoff.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use camclock_core::{CamClockError, CamClockResult, WallClockTime};

use crate::Uptime;

/// Vendor-fixed command path
pub const SYNC_DATE_PATH: &str = "/vcam/cmd.cgi?cmd=API_SyncDate";

/// Placeholder device identifier the camera accepts without checking
pub const PLACEHOLDER_IMEI: &str = "1122334455667788";

/// UTC+9 in seconds
pub const TIME_ZONE_JST_SECS: i32 = 32_400;

/// Body of the API_SyncDate request
#[derive(Clone, Debug, Serialize)]
pub struct SyncDatePayload {
    /// `YYYYMMDDhhmmss`
    pub date: String,
    pub imei: String,
    /// Uptime milliseconds modulo 1000. Filler, not wall-clock sub-seconds;
    /// the camera ignores it.
    pub ms: u32,
    /// Offset from UTC in seconds
    pub time_zone: i32,
    pub format: String,
    pub lang: String,
}

impl SyncDatePayload {
    pub fn new(time: WallClockTime, ms: u32, imei: &str, time_zone_secs: i32) -> Self {
        SyncDatePayload {
            date: time.compact(),
            imei: imei.to_string(),
            ms,
            time_zone: time_zone_secs,
            format: "dd/MM/yyyy HH:mm:ss".to_string(),
            lang: "ja_JP".to_string(),
        }
    }
}

/// Client for the camera's time-sync endpoint
pub struct DvrClient {
    addr: SocketAddr,
    connect_timeout: Duration,
    response_timeout: Duration,
    imei: String,
    time_zone_secs: i32,
    uptime: Uptime,
}

impl DvrClient {
    pub fn new(
        addr: SocketAddr,
        connect_timeout: Duration,
        response_timeout: Duration,
        imei: impl Into<String>,
        time_zone_secs: i32,
    ) -> Self {
        DvrClient {
            addr,
            connect_timeout,
            response_timeout,
            imei: imei.into(),
            time_zone_secs,
            uptime: Uptime::new(),
        }
    }

    #[inline]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The payload that would be sent for a given timestamp
    pub fn payload_for(&self, time: WallClockTime) -> SyncDatePayload {
        SyncDatePayload::new(
            time,
            self.uptime.millis_remainder(),
            &self.imei,
            self.time_zone_secs,
        )
    }

    /// Push the trusted time to the camera, best-effort
    ///
    /// Fails when the connection cannot be established; after that the only
    /// remaining check is that some response arrives before the bounded wait
    /// runs out.
    pub async fn push_time(&self, time: WallClockTime) -> CamClockResult<()> {
        let payload = self.payload_for(time);
        let body = serde_json::to_string(&payload)
            .map_err(|e| CamClockError::InvalidPacket(e.to_string()))?;
        let request = build_request(&self.addr.ip().to_string(), &body);

        let mut stream = timeout(self.connect_timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| CamClockError::Timeout {
                what: "DVR connect",
                after: self.connect_timeout,
            })?
            .map_err(|e| CamClockError::NetworkUnavailable(format!("{}: {e}", self.addr)))?;

        stream
            .write_all(request.as_bytes())
            .await
            .map_err(|e| CamClockError::NetworkUnavailable(e.to_string()))?;

        // wait for the response to show up, then drain and discard it
        let mut buf = [0u8; 512];
        let first = timeout(self.response_timeout, stream.read(&mut buf))
            .await
            .map_err(|_| CamClockError::Timeout {
                what: "DVR response",
                after: self.response_timeout,
            })?
            .map_err(|e| CamClockError::NetworkUnavailable(e.to_string()))?;

        if first > 0 {
            loop {
                match timeout(Duration::from_millis(200), stream.read(&mut buf)).await {
                    Ok(Ok(0)) | Ok(Err(_)) | Err(_) => break,
                    Ok(Ok(_)) => continue,
                }
            }
        }

        tracing::info!(addr = %self.addr, date = %payload.date, "time pushed to DVR");
        Ok(())
    }
}

/// Hand-written HTTP/1.1 request, the way the camera expects it
fn build_request(host: &str, body: &str) -> String {
    format!(
        "POST {SYNC_DATE_PATH} HTTP/1.1\r\n\
         Host: {host}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         \r\n\
         {body}\r\n",
        body.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    fn sample_time() -> WallClockTime {
        WallClockTime::new(2024, 3, 5, 7, 8, 9).unwrap()
    }

    fn client_for(addr: SocketAddr) -> DvrClient {
        DvrClient::new(
            addr,
            Duration::from_millis(500),
            Duration::from_millis(500),
            PLACEHOLDER_IMEI,
            TIME_ZONE_JST_SECS,
        )
    }

    #[test]
    fn test_payload_fields() {
        let payload = SyncDatePayload::new(sample_time(), 123, PLACEHOLDER_IMEI, 32_400);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["date"], "20240305070809");
        assert_eq!(json["imei"], "1122334455667788");
        assert_eq!(json["ms"], 123);
        assert_eq!(json["time_zone"], 32_400);
        assert_eq!(json["format"], "dd/MM/yyyy HH:mm:ss");
        assert_eq!(json["lang"], "ja_JP");
    }

    #[test]
    fn test_request_shape() {
        let request = build_request("193.168.0.1", "{\"a\":1}");
        assert!(request.starts_with("POST /vcam/cmd.cgi?cmd=API_SyncDate HTTP/1.1\r\n"));
        assert!(request.contains("Host: 193.168.0.1\r\n"));
        assert!(request.contains("Content-Type: application/json\r\n"));
        assert!(request.contains("Content-Length: 7\r\n"));
        assert!(request.ends_with("\r\n\r\n{\"a\":1}\r\n"));
    }

    #[tokio::test]
    async fn test_push_time_against_local_camera() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 2048];
            let n = stream.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nOK")
                .await
                .unwrap();
            request
        });

        client_for(addr).push_time(sample_time()).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.contains("cmd=API_SyncDate"));
        assert!(request.contains("\"date\":\"20240305070809\""));
    }

    #[tokio::test]
    async fn test_push_time_fails_when_unreachable() {
        // grab a port that nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client_for(addr).push_time(sample_time()).await;
        assert!(matches!(
            result,
            Err(CamClockError::NetworkUnavailable(_)) | Err(CamClockError::Timeout { .. })
        ));
    }
}
