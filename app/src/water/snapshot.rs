use serde::Serialize;

use crate::core::{time::DateTime, unit::CubicMeter};
use crate::water::{
    MeterUsage, Reading,
    leak::{self, LeakAnalysis, LeakAnalysisError},
    rollup::ConsumptionRollup,
};

const KEPT_READINGS: usize = 24;

/// Everything published for one account after a successful refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterSnapshot {
    pub index: CubicMeter,
    #[serde(flatten)]
    pub consumption: ConsumptionRollup,
    pub time: String,
    pub meter_serial: String,
    pub average: f64,
    pub median: f64,
    pub total_readings: usize,
    pub leak: LeakAnalysis,
    pub readings: Vec<Reading>,
}

impl WaterSnapshot {
    pub fn empty(usage: &MeterUsage) -> Self {
        Self {
            index: CubicMeter::default(),
            consumption: ConsumptionRollup::default(),
            time: String::new(),
            meter_serial: String::new(),
            average: usage.average,
            median: usage.median,
            total_readings: 0,
            leak: LeakAnalysis::insufficient_data(),
            readings: vec![],
        }
    }

    pub fn build(usage: &MeterUsage, leak_threshold: CubicMeter, now: DateTime) -> Result<Self, LeakAnalysisError> {
        let Some(last) = usage.readings.last() else {
            return Ok(Self::empty(usage));
        };

        let analysis = leak::analyze(&usage.readings, leak_threshold)?;

        if analysis.is_leak {
            tracing::warn!(
                "Potential water leak detected on meter {} with confidence {}: {}",
                last.meter_serial,
                analysis.confidence.as_percent().rounded(1),
                analysis.reason
            );
        }

        let first_kept = usage.readings.len().saturating_sub(KEPT_READINGS);

        Ok(Self {
            index: last.index,
            consumption: ConsumptionRollup::calculate(&usage.readings, now),
            time: last.time.clone(),
            meter_serial: last.meter_serial.clone(),
            average: usage.average,
            median: usage.median,
            total_readings: usage.readings.len(),
            leak: analysis,
            readings: usage.readings[first_kept..].to_vec(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.total_readings == 0
    }
}
