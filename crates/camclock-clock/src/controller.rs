//! Boot-time clock sync decision logic

use chrono::TimeDelta;

use camclock_core::{BuildId, CamClockResult, WallClockTime};

use crate::{BootStore, HardwareClock, NetworkTimeSource, SessionFlag, TimeOfDay};

/// Average delay between compiling an image and that image actually running
/// on target hardware; the reseed timestamp is advanced by this much.
pub const STARTUP_SKEW_SECS: i64 = 20;

/// What the boot decision did to the hardware clock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockVerdict {
    /// New image, first run this power session: clock was re-seeded
    Reseeded,
    /// Clock already trusted for this image; left untouched
    Kept,
}

/// Outcome of one boot decision, for callers that show status
#[derive(Clone, Copy, Debug)]
pub struct BootSyncReport {
    pub verdict: ClockVerdict,
    /// The value copied into the host time-of-day facility
    pub time_of_day: WallClockTime,
}

/// Decides, once per boot, whether the hardware clock needs re-seeding
///
/// The clock is written only when a new firmware image is observed for the
/// first time in a power session. Two guards make the write happen at most
/// once: the persisted build id (across power cycles) and the session flag
/// (across soft resets within one power cycle).
pub struct ClockSyncController {
    build: BuildId,
    compile_time: WallClockTime,
    session: SessionFlag,
}

impl ClockSyncController {
    pub fn new(build: BuildId, compile_time: WallClockTime) -> Self {
        ClockSyncController {
            build,
            compile_time,
            session: SessionFlag::new(),
        }
    }

    /// The controller for the running image
    pub fn for_current_build() -> CamClockResult<Self> {
        Ok(Self::new(BuildId::current(), camclock_core::compile_time()?))
    }

    #[inline]
    pub fn build(&self) -> &BuildId {
        &self.build
    }

    #[inline]
    pub fn session_marked(&self) -> bool {
        self.session.is_marked()
    }

    /// The timestamp a reseed writes: compile time plus the startup skew
    pub fn reseed_target(&self) -> WallClockTime {
        self.compile_time + TimeDelta::seconds(STARTUP_SKEW_SECS)
    }

    /// The boot-time branch
    ///
    /// Re-seeds the hardware clock if and only if neither guard holds, then
    /// always copies the clock into the host time-of-day facility. The
    /// session flag is set before the write: a soft reset landing in the
    /// middle of the write must not trigger a second write when this runs
    /// again in the same power session.
    pub fn sync_at_boot(
        &mut self,
        clock: &mut dyn HardwareClock,
        store: &mut dyn BootStore,
        tod: &mut dyn TimeOfDay,
    ) -> CamClockResult<BootSyncReport> {
        let stored = store.last_synced_build()?;

        let verdict = if self.session.is_marked() || stored == self.build {
            tracing::info!(build = %self.build, "hardware clock trusted, keeping value");
            ClockVerdict::Kept
        } else {
            self.session.mark();
            let target = self.reseed_target();
            tracing::info!(
                build = %self.build,
                stored = %stored,
                %target,
                "new image observed, re-seeding hardware clock"
            );
            clock.adjust(target)?;
            store.record_build(&self.build)?;
            ClockVerdict::Reseeded
        };

        let now = clock.read()?;
        tod.set(now)?;
        Ok(BootSyncReport {
            verdict,
            time_of_day: now,
        })
    }

    /// Operator setup mode: seed the hardware clock from a network authority
    ///
    /// No idempotence guard; this path only runs when explicitly invoked, and
    /// any failure is terminal for the boot.
    pub async fn sync_from_network<S: NetworkTimeSource>(
        &self,
        clock: &mut dyn HardwareClock,
        source: &S,
    ) -> CamClockResult<WallClockTime> {
        let fetched = source.fetch().await?;
        tracing::info!(%fetched, "seeding hardware clock from network authority");
        clock.adjust(fetched)?;
        Ok(fetched)
    }
}
