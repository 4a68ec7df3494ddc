//! SNTP client for operator setup mode
//!
//! One request, one reply, no discipline loop: the fetched time goes straight
//! into the hardware clock, so a single coarse sample is all that is needed.

use std::future::Future;
use std::time::Duration;

use tokio::net::{lookup_host, UdpSocket};
use tokio::time::timeout;

use camclock_clock::NetworkTimeSource;
use camclock_core::{CamClockError, CamClockResult, WallClockTime};

/// SNTP packet length (no authenticator)
pub const SNTP_PACKET_LEN: usize = 48;

/// Seconds between the NTP era (1900) and the Unix epoch (1970)
const NTP_UNIX_OFFSET: u32 = 2_208_988_800;

/// One-shot SNTP client
pub struct SntpClient {
    /// Authority host:port, resolved at fetch time
    authority: String,
    timeout: Duration,
    /// Fixed offset applied to the (UTC) authority time
    utc_offset_secs: i64,
}

impl SntpClient {
    pub fn new(authority: impl Into<String>, timeout: Duration, utc_offset_secs: i64) -> Self {
        SntpClient {
            authority: authority.into(),
            timeout,
            utc_offset_secs,
        }
    }

    /// Perform the exchange and return local wall-clock time
    pub async fn fetch_time(&self) -> CamClockResult<WallClockTime> {
        let addr = lookup_host(&self.authority)
            .await
            .map_err(|e| CamClockError::NetworkUnavailable(format!("{}: {e}", self.authority)))?
            .next()
            .ok_or_else(|| {
                CamClockError::NetworkUnavailable(format!("{} did not resolve", self.authority))
            })?;

        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| CamClockError::NetworkUnavailable(e.to_string()))?;
        socket
            .connect(addr)
            .await
            .map_err(|e| CamClockError::NetworkUnavailable(e.to_string()))?;
        socket
            .send(&build_request())
            .await
            .map_err(|e| CamClockError::NetworkUnavailable(e.to_string()))?;

        let mut buf = [0u8; SNTP_PACKET_LEN];
        let len = timeout(self.timeout, socket.recv(&mut buf))
            .await
            .map_err(|_| CamClockError::Timeout {
                what: "network time fetch",
                after: self.timeout,
            })?
            .map_err(|e| CamClockError::NetworkUnavailable(e.to_string()))?;

        let unix = parse_reply(&buf[..len])?;
        tracing::info!(authority = %self.authority, unix, "time authority answered");
        WallClockTime::from_unix(unix + self.utc_offset_secs)
    }
}

impl NetworkTimeSource for SntpClient {
    fn fetch(&self) -> impl Future<Output = CamClockResult<WallClockTime>> + Send {
        self.fetch_time()
    }
}

/// Client request: LI=0, VN=4, mode=3, everything else zero
pub(crate) fn build_request() -> [u8; SNTP_PACKET_LEN] {
    let mut packet = [0u8; SNTP_PACKET_LEN];
    packet[0] = 0x23;
    packet
}

/// Extract Unix seconds from a server reply
///
/// Validates mode (server or broadcast) and rejects stratum 0, which is the
/// kiss-of-death marker.
pub(crate) fn parse_reply(buf: &[u8]) -> CamClockResult<i64> {
    if buf.len() < SNTP_PACKET_LEN {
        return Err(CamClockError::InvalidPacket(format!(
            "SNTP reply too short: {} bytes",
            buf.len()
        )));
    }

    let mode = buf[0] & 0x07;
    if mode != 4 && mode != 5 {
        return Err(CamClockError::InvalidPacket(format!(
            "unexpected SNTP mode {mode}"
        )));
    }

    let stratum = buf[1];
    if stratum == 0 {
        return Err(CamClockError::NetworkUnavailable(
            "time authority sent kiss-of-death".into(),
        ));
    }

    // transmit timestamp, integer seconds
    let ntp_secs = u32::from_be_bytes([buf[40], buf[41], buf[42], buf[43]]);
    if ntp_secs < NTP_UNIX_OFFSET {
        return Err(CamClockError::InvalidPacket(format!(
            "transmit timestamp {ntp_secs} predates the Unix epoch"
        )));
    }
    Ok(i64::from(ntp_secs - NTP_UNIX_OFFSET))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_with(ntp_secs: u32) -> [u8; SNTP_PACKET_LEN] {
        let mut packet = [0u8; SNTP_PACKET_LEN];
        packet[0] = 0x24; // LI=0, VN=4, mode=4
        packet[1] = 2; // stratum
        packet[40..44].copy_from_slice(&ntp_secs.to_be_bytes());
        packet
    }

    #[test]
    fn test_request_shape() {
        let packet = build_request();
        assert_eq!(packet.len(), SNTP_PACKET_LEN);
        assert_eq!(packet[0], 0x23);
        assert!(packet[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_parse_reply_extracts_unix_seconds() {
        // 2024-03-05 07:08:09 UTC
        let unix = 1_709_622_489i64;
        let packet = reply_with((unix + i64::from(NTP_UNIX_OFFSET)) as u32);
        assert_eq!(parse_reply(&packet).unwrap(), unix);
    }

    #[test]
    fn test_parse_reply_rejects_short_buffer() {
        assert!(matches!(
            parse_reply(&[0u8; 20]),
            Err(CamClockError::InvalidPacket(_))
        ));
    }

    #[test]
    fn test_parse_reply_rejects_client_mode() {
        let mut packet = reply_with(NTP_UNIX_OFFSET + 1);
        packet[0] = 0x23; // mode 3 = client, not a valid reply
        assert!(matches!(
            parse_reply(&packet),
            Err(CamClockError::InvalidPacket(_))
        ));
    }

    #[test]
    fn test_parse_reply_rejects_kiss_of_death() {
        let mut packet = reply_with(NTP_UNIX_OFFSET + 1);
        packet[1] = 0;
        assert!(matches!(
            parse_reply(&packet),
            Err(CamClockError::NetworkUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_against_local_authority() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let authority = format!("127.0.0.1:{}", server.local_addr().unwrap().port());

        tokio::spawn(async move {
            let mut buf = [0u8; SNTP_PACKET_LEN];
            let (_, peer) = server.recv_from(&mut buf).await.unwrap();
            assert_eq!(buf[0], 0x23);
            // 2024-03-05 07:08:09 UTC
            let reply = reply_with((1_709_622_489 + i64::from(NTP_UNIX_OFFSET)) as u32);
            server.send_to(&reply, peer).await.unwrap();
        });

        let client = SntpClient::new(authority, Duration::from_secs(2), 0);
        let fetched = client.fetch_time().await.unwrap();
        assert_eq!(fetched, WallClockTime::new(2024, 3, 5, 7, 8, 9).unwrap());
    }

    #[tokio::test]
    async fn test_fetch_times_out_when_authority_is_silent() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let authority = format!("127.0.0.1:{}", server.local_addr().unwrap().port());

        let client = SntpClient::new(authority, Duration::from_millis(100), 0);
        assert!(matches!(
            client.fetch_time().await,
            Err(CamClockError::Timeout { .. })
        ));
    }
}
