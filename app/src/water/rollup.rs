use serde::Serialize;

use crate::core::{time::DateTime, unit::CubicMeter};
use crate::water::Reading;

/// Consumption totals of the current hour, day, week and month, aligned to calendar
/// boundaries relative to `now`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ConsumptionRollup {
    #[serde(rename = "consumption_hourly")]
    pub hourly: CubicMeter,
    #[serde(rename = "consumption_daily")]
    pub daily: CubicMeter,
    #[serde(rename = "consumption_weekly")]
    pub weekly: CubicMeter,
    #[serde(rename = "consumption_monthly")]
    pub monthly: CubicMeter,
}

impl ConsumptionRollup {
    pub fn calculate(readings: &[Reading], now: DateTime) -> Self {
        let Some(last) = readings.last() else {
            return Self::default();
        };

        let since = |boundary: DateTime| -> CubicMeter {
            reading_at_or_before(readings, boundary)
                .map(|start| (last.index - start.index).rounded(3))
                .unwrap_or_default()
        };

        Self {
            hourly: last_interval(readings),
            daily: since(now.start_of_day()),
            weekly: since(now.start_of_week()),
            monthly: since(now.start_of_month()),
        }
    }
}

fn last_interval(readings: &[Reading]) -> CubicMeter {
    match readings {
        [.., previous, last] => (last.index - previous.index).rounded(4),
        _ => CubicMeter::default(),
    }
}

/// Most recent reading not later than `boundary`. Readings without a parseable time are
/// never picked.
pub fn reading_at_or_before(readings: &[Reading], boundary: DateTime) -> Option<&Reading> {
    readings
        .iter()
        .rev()
        .find(|r| r.timestamp.is_some_and(|ts| ts <= boundary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::water::reading::fixture::SERIAL;

    fn reading(index: f64, time: &str) -> Reading {
        Reading::new(index, time, SERIAL)
    }

    fn dt(value: &str) -> DateTime {
        DateTime::parse_reading_time(value).unwrap()
    }

    #[test]
    fn empty_readings_give_zero() {
        assert_eq!(
            ConsumptionRollup::calculate(&[], dt("2024-01-17 12:00:00")),
            ConsumptionRollup::default()
        );
    }

    #[test]
    fn hourly_needs_two_readings() {
        let rollup = ConsumptionRollup::calculate(&[reading(10.0, "2024-01-17 11:00:00")], dt("2024-01-17 12:00:00"));

        assert_eq!(rollup.hourly, CubicMeter(0.0));
    }

    #[test]
    fn hourly_rounded_to_four_decimals() {
        let readings = [reading(10.0, "2024-01-17 10:00:00"), reading(10.123456, "2024-01-17 11:00:00")];

        let rollup = ConsumptionRollup::calculate(&readings, dt("2024-01-17 12:00:00"));

        assert_eq!(rollup.hourly, CubicMeter(0.1235));
    }

    #[test]
    fn calendar_aligned_periods() {
        //2024-01-17 is a Wednesday
        let readings = [
            reading(90.0, "2023-12-31 23:00:00"),
            reading(95.0, "2024-01-14 22:00:00"),
            reading(96.0, "2024-01-15 00:00:00"),
            reading(99.0, "2024-01-16 23:00:00"),
            reading(99.5, "2024-01-17 06:00:00"),
            reading(100.25, "2024-01-17 11:00:00"),
        ];

        let rollup = ConsumptionRollup::calculate(&readings, dt("2024-01-17 11:30:00"));

        assert_eq!(rollup.hourly, CubicMeter(0.75));
        assert_eq!(rollup.daily, CubicMeter(1.25));
        assert_eq!(rollup.weekly, CubicMeter(4.25));
        assert_eq!(rollup.monthly, CubicMeter(10.25));
    }

    #[test]
    fn missing_boundary_reading_gives_zero() {
        let readings = [reading(99.5, "2024-01-17 06:00:00"), reading(100.0, "2024-01-17 11:00:00")];

        let rollup = ConsumptionRollup::calculate(&readings, dt("2024-01-17 11:30:00"));

        assert_eq!(rollup.daily, CubicMeter(0.0));
        assert_eq!(rollup.monthly, CubicMeter(0.0));
        assert_eq!(rollup.hourly, CubicMeter(0.5));
    }

    #[test]
    fn unparseable_times_are_skipped_as_boundary() {
        let readings = [
            reading(50.0, "2024-01-16 20:00:00"),
            reading(60.0, "garbage"),
            reading(61.0, "2024-01-17 11:00:00"),
        ];

        assert_eq!(
            reading_at_or_before(&readings, dt("2024-01-17 00:00:00")).map(|r| r.index),
            Some(CubicMeter(50.0))
        );
    }
}
