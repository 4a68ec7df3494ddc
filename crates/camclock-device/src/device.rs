//! Device orchestration: the boot sequence and the run loop

use camclock_clock::{
    BootStore, BootSyncReport, ClockSyncController, ClockVerdict, HardwareClock, TimeOfDay,
};
use camclock_core::{CamClockError, CamClockResult, WallClockTime};
use camclock_net::{DvrClient, SntpClient};

use crate::{adc_to_volts, format_readout, DeviceConfig, Readout, StatusSink, WifiCredentials};

/// Boot variant, selected by a physical switch sampled once at boot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootMode {
    /// Trust-or-reseed from the build timestamp, then push time to the DVR
    Automatic,
    /// Operator-invoked: fetch time from the network authority instead
    Setup,
}

/// What one boot did, for status display and tests
#[derive(Clone, Copy, Debug)]
pub struct BootReport {
    pub mode: BootMode,
    /// Present in automatic mode only
    pub sync: Option<BootSyncReport>,
    /// The trusted time at the end of boot
    pub time: WallClockTime,
}

/// The operator setup switch, a single digital input
pub trait SetupSwitch {
    fn is_engaged(&mut self) -> CamClockResult<bool>;
}

/// Battery voltage ADC
pub trait BatterySensor {
    /// Raw 12-bit count
    fn read_raw(&mut self) -> CamClockResult<u16>;
}

/// Wi-Fi association, implemented by the platform layer
pub trait WifiLink {
    fn associate(&mut self, creds: &WifiCredentials) -> CamClockResult<()>;
}

/// The peripherals a device is built from
pub struct DeviceHardware {
    pub clock: Box<dyn HardwareClock + Send>,
    pub store: Box<dyn BootStore + Send>,
    pub tod: Box<dyn TimeOfDay + Send>,
    pub switch: Box<dyn SetupSwitch + Send>,
    pub battery: Box<dyn BatterySensor + Send>,
    pub wifi: Box<dyn WifiLink + Send>,
    pub status: Box<dyn StatusSink + Send>,
}

/// The device: config, controller, peripherals, network clients
///
/// Single-threaded and sequential; every operation runs to completion or
/// returns a terminal error. Halting on that error is the binary's call.
pub struct Device {
    config: DeviceConfig,
    controller: ClockSyncController,
    hw: DeviceHardware,
    dvr: DvrClient,
    sntp: SntpClient,
}

impl Device {
    /// Build a device for the running firmware image
    pub fn new(config: DeviceConfig, hw: DeviceHardware) -> CamClockResult<Self> {
        let controller = ClockSyncController::for_current_build()?;
        Ok(Self::with_controller(config, hw, controller))
    }

    /// Build with an explicit controller (tests pin the build id)
    pub fn with_controller(
        config: DeviceConfig,
        hw: DeviceHardware,
        controller: ClockSyncController,
    ) -> Self {
        let dvr = DvrClient::new(
            config.dvr_addr,
            config.connect_timeout(),
            config.response_timeout(),
            config.imei.clone(),
            config.time_zone_secs,
        );
        let sntp = SntpClient::new(
            config.time_authority.clone(),
            config.fetch_timeout(),
            i64::from(config.time_zone_secs),
        );
        Device {
            config,
            controller,
            hw,
            dvr,
            sntp,
        }
    }

    #[inline]
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// The boot sequence
    ///
    /// Samples the setup switch exactly once, then runs the selected path to
    /// completion. Any error is terminal for this boot.
    pub async fn boot(&mut self) -> CamClockResult<BootReport> {
        // presence check: a clock that cannot answer at init is fatal before
        // any store or network access
        if self.hw.clock.read().is_err() {
            self.hw.status.status("RTC not found!");
            return Err(CamClockError::HardwareAbsent {
                peripheral: "hardware clock",
            });
        }

        let mode = if self.hw.switch.is_engaged()? {
            BootMode::Setup
        } else {
            BootMode::Automatic
        };
        tracing::info!(?mode, "booting");

        match mode {
            BootMode::Automatic => self.boot_automatic().await,
            BootMode::Setup => self.boot_setup().await,
        }
    }

    async fn boot_automatic(&mut self) -> CamClockResult<BootReport> {
        let report = self.controller.sync_at_boot(
            &mut *self.hw.clock,
            &mut *self.hw.store,
            &mut *self.hw.tod,
        )?;
        match report.verdict {
            ClockVerdict::Reseeded => self.hw.status.status("Write the time to the RTC."),
            ClockVerdict::Kept => self.hw.status.status("Use RTC value."),
        }

        self.hw.wifi.associate(&self.config.wifi)?;

        let now = self.hw.tod.get()?;
        if let Err(e) = self.dvr.push_time(now).await {
            self.hw.status.status("Connection failed");
            return Err(e);
        }

        Ok(BootReport {
            mode: BootMode::Automatic,
            sync: Some(report),
            time: now,
        })
    }

    async fn boot_setup(&mut self) -> CamClockResult<BootReport> {
        self.hw.wifi.associate(&self.config.wifi)?;

        let fetched = self
            .controller
            .sync_from_network(&mut *self.hw.clock, &self.sntp)
            .await?;
        self.hw.tod.set(fetched)?;
        self.hw.status.status("Clock set from network time.");

        Ok(BootReport {
            mode: BootMode::Setup,
            sync: None,
            time: fetched,
        })
    }

    /// One iteration of the display loop: clock + battery to the status sink
    pub fn run_once(&mut self) -> CamClockResult<Readout> {
        let now = self.hw.clock.read()?;
        let raw = self.hw.battery.read_raw()?;
        let readout = format_readout(now, adc_to_volts(raw));
        self.hw.status.readout(&readout);
        Ok(readout)
    }
}
