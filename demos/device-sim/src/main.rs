//! camclock device simulator
//!
//! Walks through the boot decision with simulated hardware:
//! - first boot of a new image re-seeds the simulated hardware clock
//! - a soft reset in the same power session keeps it
//! - a power cycle with the same image keeps it via the persisted record
//! and prints the DVR payload the device would send.

use std::time::Instant;

use tracing_subscriber::EnvFilter;

use camclock_clock::{
    ClockSyncController, ClockVerdict, HardwareClock, MemoryStore, RuntimeTimeOfDay,
};
use camclock_core::{BuildId, CamClockResult, WallClockTime};
use camclock_device::{adc_to_volts, format_readout};
use camclock_net::{SyncDatePayload, Uptime, PLACEHOLDER_IMEI, TIME_ZONE_JST_SECS};

/// Simulated battery-backed clock, starting out badly drifted
struct SimClock {
    value: WallClockTime,
}

impl HardwareClock for SimClock {
    fn read(&self) -> CamClockResult<WallClockTime> {
        Ok(self.value)
    }

    fn adjust(&mut self, t: WallClockTime) -> CamClockResult<()> {
        println!("  [clock] adjusted to {t}");
        self.value = t;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let compile_time = WallClockTime::new(2024, 3, 5, 7, 8, 9)?;
    let mut clock = SimClock {
        value: WallClockTime::new(2000, 1, 1, 0, 0, 0)?,
    };
    let mut store = MemoryStore::new();
    let mut tod = RuntimeTimeOfDay::new();

    println!("== boot 1: freshly flashed image, fresh power session ==");
    let mut session = ClockSyncController::new(BuildId::new("build-demo"), compile_time);
    let report = session.sync_at_boot(&mut clock, &mut store, &mut tod)?;
    print_verdict(report.verdict);

    println!("== boot 2: soft reset, same power session ==");
    let report = session.sync_at_boot(&mut clock, &mut store, &mut tod)?;
    print_verdict(report.verdict);

    println!("== boot 3: power cycle, same image ==");
    let mut fresh_session = ClockSyncController::new(BuildId::new("build-demo"), compile_time);
    let report = fresh_session.sync_at_boot(&mut clock, &mut store, &mut tod)?;
    print_verdict(report.verdict);

    let uptime = Uptime::from_origin(Instant::now());
    let payload = SyncDatePayload::new(
        report.time_of_day,
        uptime.millis_remainder(),
        PLACEHOLDER_IMEI,
        TIME_ZONE_JST_SECS,
    );
    println!("== DVR payload the device would POST ==");
    println!("{}", serde_json::to_string_pretty(&payload)?);

    let readout = format_readout(report.time_of_day, adc_to_volts(2048));
    println!("== panel readout ==");
    println!("{}", readout.time_line);
    println!("{}", readout.date_line);

    Ok(())
}

fn print_verdict(verdict: ClockVerdict) {
    match verdict {
        ClockVerdict::Reseeded => println!("  -> Write the time to the RTC.\n"),
        ClockVerdict::Kept => println!("  -> Use RTC value.\n"),
    }
}
