//! Status output: formatting for the OLED-style readout
//!
//! Rendering is a platform concern; this module only produces the text the
//! panel shows and defines the sink it goes to.

use camclock_core::WallClockTime;

/// 12-bit ADC full scale
pub const ADC_FULL_SCALE: f32 = 4095.0;

/// ADC reference voltage
pub const ADC_REF_VOLTS: f32 = 3.3;

/// Where status text and the periodic readout go
///
/// On target this is the OLED panel; in tests a recording buffer.
pub trait StatusSink {
    /// One-off status line ("Use RTC value.", "Connection failed", ...)
    fn status(&mut self, text: &str);
    /// The periodic time/date/voltage readout
    fn readout(&mut self, readout: &Readout);
}

/// The two lines of the periodic display
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Readout {
    /// Large line: `hh:mm:ss`
    pub time_line: String,
    /// Small line: `YYYY/MM/DD  x.xx V`
    pub date_line: String,
}

/// Format the panel contents for a timestamp and battery voltage
pub fn format_readout(t: WallClockTime, volts: f32) -> Readout {
    Readout {
        time_line: format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second()),
        date_line: format!(
            "{:04}/{:02}/{:02}  {volts:.2} V",
            t.year(),
            t.month(),
            t.day()
        ),
    }
}

/// Raw 12-bit battery ADC count to volts
pub fn adc_to_volts(raw: u16) -> f32 {
    f32::from(raw) * ADC_REF_VOLTS / ADC_FULL_SCALE
}

/// Sink that forwards everything to the log
#[derive(Debug, Default)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn status(&mut self, text: &str) {
        tracing::info!(target: "camclock::status", "{text}");
    }

    fn readout(&mut self, readout: &Readout) {
        tracing::debug!(target: "camclock::status", "{} | {}", readout.time_line, readout.date_line);
    }
}
