//! The measurement record produced by the structured read command.

use chrono::{DateTime, Utc};

/// One capture of the instrument's channel bundle.
///
/// A channel whose value could not be read or parsed is `None`; it is never
/// defaulted to a stand-in number. Temperatures and dew point are in degrees
/// Celsius, humidity in percent relative humidity.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Probe-1 temperature.
    pub temperature1: Option<f64>,
    /// Relative humidity.
    pub humidity: Option<f64>,
    /// Probe-2 temperature.
    pub temperature2: Option<f64>,
    /// Dew point.
    pub dewpoint: Option<f64>,
    /// Capture time of this record.
    pub taken_at: DateTime<Utc>,
}

impl Measurement {
    /// Create a record with all channels absent, stamped with the current
    /// time.
    pub fn new() -> Self {
        Measurement {
            temperature1: None,
            humidity: None,
            temperature2: None,
            dewpoint: None,
            taken_at: Utc::now(),
        }
    }

    /// Whether every channel of this record is absent.
    pub fn is_empty(&self) -> bool {
        self.temperature1.is_none()
            && self.humidity.is_none()
            && self.temperature2.is_none()
            && self.dewpoint.is_none()
    }
}

impl Default for Measurement {
    fn default() -> Self {
        Self::new()
    }
}
