use crate::core::{timeseries::DataPoint, unit::CubicMeter};
use crate::water::Reading;

/// Consumption between each pair of adjacent readings, stamped with the later reading's time.
pub fn derive_intervals(readings: &[Reading]) -> Vec<DataPoint<CubicMeter>> {
    readings
        .windows(2)
        .map(|pair| {
            let (previous, current) = (&pair[0], &pair[1]);
            let consumption = current.index - previous.index;

            //meter reset, replacement or clock skew; passed through unchanged
            if consumption.0 < 0.0 {
                tracing::warn!(
                    "Negative consumption {} between readings at {:?} and {:?}",
                    consumption,
                    previous.time,
                    current.time
                );
            }

            DataPoint::new(consumption, current.timestamp)
        })
        .collect()
}

/// The most recent `size` intervals (or all of them when fewer are available).
pub fn window<T>(values: &[T], size: usize) -> &[T] {
    &values[values.len().saturating_sub(size)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::water::reading::fixture::hourly_readings;

    #[test]
    fn one_interval_less_than_readings() {
        let readings = hourly_readings("2024-01-15 08:00:00", 100.0, &[0.5, 0.25, 0.0]);

        let intervals = derive_intervals(&readings);

        let values: Vec<f64> = intervals.iter().map(|dp| dp.value.0).collect();
        assert_eq!(values, vec![0.5, 0.25, 0.0]);
    }

    #[test]
    fn stamped_with_later_reading() {
        let readings = hourly_readings("2024-01-15 08:00:00", 100.0, &[0.5]);

        let intervals = derive_intervals(&readings);

        assert_eq!(intervals[0].timestamp, readings[1].timestamp);
    }

    #[test]
    fn single_or_no_reading_yields_no_interval() {
        let readings = hourly_readings("2024-01-15 08:00:00", 100.0, &[]);

        assert!(derive_intervals(&readings).is_empty());
        assert!(derive_intervals(&[]).is_empty());
    }

    #[test]
    fn negative_consumption_passes_through() {
        let readings = vec![
            Reading::new(100.0, "2024-01-15 08:00:00", "SN"),
            Reading::new(99.5, "2024-01-15 09:00:00", "SN"),
        ];

        let intervals = derive_intervals(&readings);

        assert_eq!(intervals[0].value, CubicMeter(-0.5));
    }

    #[test]
    fn window_takes_most_recent() {
        let values = [1, 2, 3, 4, 5];

        assert_eq!(window(&values, 3), &[3, 4, 5]);
        assert_eq!(window(&values, 12), &[1, 2, 3, 4, 5]);
    }
}
