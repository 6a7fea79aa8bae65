use serde::Serialize;

use crate::core::{time::DateTime, unit::CubicMeter};

/// One cumulative meter index as reported by the utility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub index: CubicMeter,
    pub time: String,
    #[serde(skip)]
    pub timestamp: Option<DateTime>,
    pub meter_serial: String,
}

impl Reading {
    pub fn new(index: impl Into<CubicMeter>, time: impl Into<String>, meter_serial: impl Into<String>) -> Self {
        let time = time.into();
        let timestamp = DateTime::parse_reading_time(&time);

        Self {
            index: index.into(),
            time,
            timestamp,
            meter_serial: meter_serial.into(),
        }
    }
}

/// Result of one usage request, readings ordered oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeterUsage {
    pub readings: Vec<Reading>,
    pub average: f64,
    pub median: f64,
}

#[cfg(test)]
pub mod fixture {
    use super::Reading;
    use crate::core::time::{DateTime, Duration};

    pub const SERIAL: &str = "AB123456";

    //hourly readings starting at `start`, one per consumption value plus the initial one
    pub fn hourly_readings(start: &str, initial_index: f64, consumption: &[f64]) -> Vec<Reading> {
        let start = DateTime::parse_reading_time(start).unwrap();
        let mut index = initial_index;
        let mut readings = vec![Reading::new(index, start.to_iso_string(), SERIAL)];

        for (i, c) in consumption.iter().enumerate() {
            index += c;
            let at = start + Duration::hours(i as i64 + 1);
            readings.push(Reading::new(index, at.to_iso_string(), SERIAL));
        }

        readings
    }
}
