use crate::core::{time::DailyTimeRange, timeseries::DataPoint, unit::CubicMeter};
use crate::t;

use super::MIN_FLOW;

pub fn night_band() -> DailyTimeRange {
    t!(1:00 - 5:00)
}

fn is_flowing(consumption: f64) -> bool {
    consumption > MIN_FLOW
}

/// Number of intervals, counted back from the most recent one, with flow above the floor.
/// A single dry interval ends the run.
pub fn consecutive_flow_hours(consumption: &[f64]) -> usize {
    consumption.iter().rev().take_while(|c| is_flowing(**c)).count()
}

/// Sample standard deviation over mean of the flowing intervals. Undefined with fewer than
/// three flowing intervals.
pub fn coefficient_of_variation(consumption: &[f64]) -> Option<f64> {
    let flowing: Vec<f64> = consumption.iter().copied().filter(|c| is_flowing(*c)).collect();
    if flowing.len() < 3 {
        return None;
    }

    let n = flowing.len() as f64;
    let mean = flowing.iter().sum::<f64>() / n;
    let variance = flowing.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (n - 1.0);

    Some(variance.sqrt() / mean)
}

/// Coefficient of determination of a least-squares line through the cumulative index,
/// using reading order as x. Identical values count as a perfect fit.
pub fn r_squared(index: &[f64]) -> Option<f64> {
    if index.len() < 3 {
        return None;
    }

    //shift by the first value so identical readings give exact zero deviations
    let origin = index[0];
    let ys: Vec<f64> = index.iter().map(|y| y - origin).collect();

    let n = ys.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (i, y) in ys.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    if syy == 0.0 {
        return Some(1.0);
    }

    Some(((sxy * sxy) / (sxx * syy)).clamp(0.0, 1.0))
}

/// Whether any interval inside the night band had flow above the floor. Intervals without a
/// timestamp are ignored.
pub fn has_night_consumption(intervals: &[DataPoint<CubicMeter>]) -> bool {
    let night = night_band();

    intervals.iter().any(|dp| match dp.timestamp {
        Some(timestamp) => night.contains(timestamp.time()) && is_flowing(dp.value.0),
        None => false,
    })
}
