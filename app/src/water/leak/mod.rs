mod factors;
mod interval;
mod score;

use derive_more::derive::{Display, Error};
use serde::Serialize;

use crate::core::unit::{CubicMeter, Probability};
use crate::water::Reading;

pub use factors::{coefficient_of_variation, consecutive_flow_hours, has_night_consumption, night_band, r_squared};
pub use interval::derive_intervals;
pub use score::LeakScore;

/// Flow at or below this volume per interval counts as no flow.
pub const MIN_FLOW: f64 = 0.005;
/// Number of most recent intervals the statistics look at.
pub const WINDOW_SIZE: usize = 12;
/// Fewer intervals than this yield the insufficient-data verdict.
pub const MIN_INTERVALS: usize = 4;

const MIN_CONSECUTIVE_HOURS: usize = 6;
const POINTS_PER_CONSECUTIVE_HOUR: f64 = 5.0;
const MAX_CONSECUTIVE_POINTS: f64 = 30.0;
const MAX_CV: f64 = 0.5;
const MAX_CV_POINTS: f64 = 25.0;
const MIN_R_SQUARED: f64 = 0.95;
const MAX_R_SQUARED_POINTS: f64 = 25.0;
const NIGHT_POINTS: f64 = 20.0;
const THRESHOLD_POINTS: f64 = 15.0;

const NO_INDICATORS: &str = "No leak indicators";
const INSUFFICIENT_DATA: &str = "Insufficient data for analysis";

#[derive(Debug, Display, Error, PartialEq)]
pub enum LeakAnalysisError {
    #[display("Reading at {time:?} has a non-finite index {index}")]
    NonFiniteIndex { time: String, index: f64 },
}

/// Verdict of one analysis run. Built fresh every cycle and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeakAnalysis {
    pub is_leak: bool,
    pub confidence: Probability,
    pub reason: String,
    pub consecutive_hours: usize,
    pub coefficient_of_variation: Option<f64>,
    pub r_squared: Option<f64>,
    pub night_consumption: bool,
    pub average_hourly_flow: CubicMeter,
    pub factors: LeakFactors,
}

/// Evidence of the indicators that contributed points. Untriggered ones stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeakFactors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consecutive_hours: Option<FactorEvidence<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coefficient_of_variation: Option<FactorEvidence<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r_squared: Option<FactorEvidence<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub night_consumption: Option<FactorEvidence<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple_threshold: Option<FactorEvidence<CubicMeter>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorEvidence<V> {
    pub value: V,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<V>,
    pub score: f64,
}

impl<V> FactorEvidence<V> {
    fn new(value: V, threshold: Option<V>, score: f64) -> Self {
        Self { value, threshold, score }
    }
}

impl LeakAnalysis {
    pub fn insufficient_data() -> Self {
        Self {
            is_leak: false,
            confidence: Probability::default(),
            reason: INSUFFICIENT_DATA.to_string(),
            consecutive_hours: 0,
            coefficient_of_variation: None,
            r_squared: None,
            night_consumption: false,
            average_hourly_flow: CubicMeter::default(),
            factors: LeakFactors::default(),
        }
    }

    pub fn score(&self) -> f64 {
        let factors = &self.factors;
        [
            factors.consecutive_hours.as_ref().map(|f| f.score),
            factors.coefficient_of_variation.as_ref().map(|f| f.score),
            factors.r_squared.as_ref().map(|f| f.score),
            factors.night_consumption.as_ref().map(|f| f.score),
            factors.simple_threshold.as_ref().map(|f| f.score),
        ]
        .into_iter()
        .flatten()
        .sum()
    }
}

/// Classifies the most recent readings (oldest first) as leak or normal usage.
///
/// The score is the sum of independent indicators evaluated over the last [`WINDOW_SIZE`]
/// intervals:
///
/// | Indicator          | Trigger                       | Points                      |
/// |--------------------|-------------------------------|-----------------------------|
/// | consecutive flow   | run >= 6 intervals            | `min(30, run * 5)`          |
/// | low variation      | CV < 0.5                      | `25 * (1 - CV / 0.5)`       |
/// | linear growth      | R² > 0.95                     | `25 * (R² - 0.95) / 0.05`   |
/// | night consumption  | flow between 01:00 and 05:00  | 20                          |
/// | simple threshold   | average flow > `threshold`    | 15                          |
///
/// A score of 50 or more is a leak. Fewer than [`MIN_INTERVALS`] intervals is not an error
/// but the insufficient-data verdict.
pub fn analyze(readings: &[Reading], threshold: CubicMeter) -> Result<LeakAnalysis, LeakAnalysisError> {
    if let Some(reading) = readings.iter().find(|r| !r.index.0.is_finite()) {
        return Err(LeakAnalysisError::NonFiniteIndex {
            time: reading.time.clone(),
            index: reading.index.0,
        });
    }

    let intervals = derive_intervals(readings);
    if intervals.len() < MIN_INTERVALS {
        return Ok(LeakAnalysis::insufficient_data());
    }

    let window = interval::window(&intervals, WINDOW_SIZE);
    let consumption: Vec<f64> = window.iter().map(|dp| dp.value.0).collect();
    //closing index of every interval in the window
    let index: Vec<f64> = interval::window(readings, window.len())
        .iter()
        .map(|r| r.index.0)
        .collect();

    let consecutive_hours = consecutive_flow_hours(&consumption);
    let cv = coefficient_of_variation(&consumption);
    let r2 = r_squared(&index);
    let night_consumption = has_night_consumption(window);
    let average_hourly_flow = CubicMeter(consumption.iter().sum::<f64>() / consumption.len() as f64);

    let mut score = LeakScore::default();
    let mut factors = LeakFactors::default();
    let mut reasons: Vec<String> = vec![];

    if consecutive_hours >= MIN_CONSECUTIVE_HOURS {
        let points = (consecutive_hours as f64 * POINTS_PER_CONSECUTIVE_HOUR).min(MAX_CONSECUTIVE_POINTS);
        score += points;
        factors.consecutive_hours = Some(FactorEvidence::new(consecutive_hours, Some(MIN_CONSECUTIVE_HOURS), points));
        reasons.push(format!("Continuous flow for {} hours", consecutive_hours));
    }

    if let Some(cv) = cv.filter(|cv| *cv < MAX_CV) {
        let points = MAX_CV_POINTS * (1.0 - cv / MAX_CV);
        score += points;
        factors.coefficient_of_variation = Some(FactorEvidence::new(cv, Some(MAX_CV), points));
        reasons.push(format!("Very constant flow (CV: {:.2})", cv));
    }

    if let Some(r2) = r2.filter(|r2| *r2 > MIN_R_SQUARED) {
        let points = MAX_R_SQUARED_POINTS * (r2 - MIN_R_SQUARED) / (1.0 - MIN_R_SQUARED);
        score += points;
        factors.r_squared = Some(FactorEvidence::new(r2, Some(MIN_R_SQUARED), points));
        reasons.push(format!("Linear consumption pattern (R²: {:.3})", r2));
    }

    if night_consumption {
        score += NIGHT_POINTS;
        factors.night_consumption = Some(FactorEvidence::new(true, None, NIGHT_POINTS));
        reasons.push(format!("Consumption during night hours ({})", night_band()));
    }

    if average_hourly_flow > threshold {
        score += THRESHOLD_POINTS;
        factors.simple_threshold = Some(FactorEvidence::new(average_hourly_flow, Some(threshold), THRESHOLD_POINTS));
        reasons.push(format!(
            "Average flow {:.4} m³/h above threshold {:.4} m³/h",
            average_hourly_flow.0, threshold.0
        ));
    }

    let reason = if reasons.is_empty() {
        NO_INDICATORS.to_string()
    } else {
        reasons.join("; ")
    };

    tracing::debug!(
        "Leak analysis over {} intervals scored {:.2} points: {}",
        window.len(),
        score.points(),
        reason
    );

    Ok(LeakAnalysis {
        is_leak: score.is_leak(),
        confidence: score.confidence(),
        reason,
        consecutive_hours,
        coefficient_of_variation: cv,
        r_squared: r2,
        night_consumption,
        average_hourly_flow,
        factors,
    })
}
