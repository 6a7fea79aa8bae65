use serde::Serialize;
use serde_json::json;

use super::config::Attributes;
use crate::core::unit::CubicMeter;
use crate::water::WaterSnapshot;

/// The single state document all entities of one account read from.
#[derive(Debug, Serialize)]
pub struct StatePayload<'a> {
    index: CubicMeter,
    consumption_hourly: CubicMeter,
    consumption_daily: CubicMeter,
    consumption_weekly: CubicMeter,
    consumption_monthly: CubicMeter,
    leak_confidence: f64,
    leak_detected: bool,
    last_reading: &'a str,
    meter_serial: &'a str,
}

impl<'a> StatePayload<'a> {
    pub fn new(snapshot: &'a WaterSnapshot) -> Self {
        Self {
            index: snapshot.index,
            consumption_hourly: snapshot.consumption.hourly,
            consumption_daily: snapshot.consumption.daily,
            consumption_weekly: snapshot.consumption.weekly,
            consumption_monthly: snapshot.consumption.monthly,
            leak_confidence: snapshot.leak.confidence.as_percent().rounded(1).0,
            leak_detected: snapshot.leak.is_leak,
            last_reading: &snapshot.time,
            meter_serial: &snapshot.meter_serial,
        }
    }
}

pub fn attributes_payload(
    attributes: Attributes,
    snapshot: &WaterSnapshot,
    leak_threshold: CubicMeter,
) -> Option<serde_json::Value> {
    let leak = &snapshot.leak;

    match attributes {
        Attributes::None => None,
        Attributes::MeterStatistics => Some(json!({
            "total_readings": snapshot.total_readings,
            "average": snapshot.average,
            "median": snapshot.median,
        })),
        Attributes::LeakAnalysis => Some(json!({
            "reason": leak.reason,
            "consecutive_hours": leak.consecutive_hours,
            "coefficient_of_variation": leak.coefficient_of_variation,
            "r_squared": leak.r_squared,
            "night_consumption": leak.night_consumption,
            "average_hourly_flow": leak.average_hourly_flow,
        })),
        Attributes::LeakThreshold => Some(json!({
            "hourly_consumption": snapshot.consumption.hourly,
            "threshold": leak_threshold,
        })),
    }
}
