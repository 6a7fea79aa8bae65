use serde::Deserialize;
use serde_json::Value;

use super::ApavitalError;
use crate::water::{MeterUsage, Reading};

#[derive(Debug, Deserialize)]
pub struct UsageResponse {
    #[serde(default)]
    data: Option<Vec<UsageReading>>,
    #[serde(default)]
    avg: Option<Value>,
    #[serde(default)]
    mid: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct UsageReading {
    #[serde(default)]
    index_cit: Value,
    #[serde(default)]
    time: Option<String>,
    #[serde(default, rename = "METERSERIAL")]
    meter_serial: Option<String>,
}

impl UsageResponse {
    pub fn reading_count(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }
}

impl TryFrom<UsageResponse> for MeterUsage {
    type Error = ApavitalError;

    fn try_from(response: UsageResponse) -> Result<Self, Self::Error> {
        let readings = response
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Reading::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MeterUsage {
            readings,
            average: response.avg.as_ref().and_then(as_number).unwrap_or_default(),
            median: response.mid.as_ref().and_then(as_number).unwrap_or_default(),
        })
    }
}

impl TryFrom<UsageReading> for Reading {
    type Error = ApavitalError;

    fn try_from(reading: UsageReading) -> Result<Self, Self::Error> {
        let index = as_number(&reading.index_cit)
            .ok_or_else(|| ApavitalError::MalformedIndex(reading.index_cit.to_string()))?;

        Ok(Reading::new(
            index,
            reading.time.unwrap_or_default(),
            reading.meter_serial.unwrap_or_default(),
        ))
    }
}

//vendor sends numbers either as JSON numbers or as strings
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::unit::CubicMeter;

    fn parse(json: serde_json::Value) -> Result<MeterUsage, ApavitalError> {
        let response: UsageResponse = serde_json::from_value(json).unwrap();
        response.try_into()
    }

    #[test]
    fn numeric_and_string_indices() {
        let usage = parse(serde_json::json!({
            "data": [
                { "INDEX_CIT": 123.456, "TIME": "2024-01-15 13:00:00", "METERSERIAL": "AB1" },
                { "INDEX_CIT": " 123.5 ", "TIME": "2024-01-15 14:00:00", "METERSERIAL": "AB1" },
            ],
            "avg": 0.52,
            "mid": "0.48",
        }))
        .unwrap();

        assert_eq!(usage.readings.len(), 2);
        assert_eq!(usage.readings[0].index, CubicMeter(123.456));
        assert_eq!(usage.readings[1].index, CubicMeter(123.5));
        assert_eq!(usage.readings[1].meter_serial, "AB1");
        assert!(usage.readings[1].timestamp.is_some());
        assert_eq!(usage.average, 0.52);
        assert_eq!(usage.median, 0.48);
    }

    #[test]
    fn missing_or_empty_data_gives_no_readings() {
        let usage = parse(serde_json::json!({ "avg": 1.5 })).unwrap();
        assert!(usage.readings.is_empty());
        assert_eq!(usage.average, 1.5);
        assert_eq!(usage.median, 0.0);

        let usage = parse(serde_json::json!({ "data": [] })).unwrap();
        assert!(usage.readings.is_empty());

        let usage = parse(serde_json::json!({ "data": null })).unwrap();
        assert!(usage.readings.is_empty());
    }

    #[test]
    fn non_numeric_index_is_malformed() {
        let result = parse(serde_json::json!({
            "data": [ { "INDEX_CIT": "abc", "TIME": "2024-01-15 13:00:00", "METERSERIAL": "AB1" } ]
        }));

        assert!(matches!(result, Err(ApavitalError::MalformedIndex(v)) if v == "\"abc\""));
    }

    #[test]
    fn null_index_is_malformed() {
        let result = parse(serde_json::json!({ "data": [ { "INDEX_CIT": null } ] }));

        assert!(matches!(result, Err(ApavitalError::MalformedIndex(_))));
    }

    #[test]
    fn missing_time_and_serial_are_tolerated() {
        let usage = parse(serde_json::json!({ "data": [ { "INDEX_CIT": 5 } ] })).unwrap();

        assert_eq!(usage.readings[0].time, "");
        assert_eq!(usage.readings[0].timestamp, None);
        assert_eq!(usage.readings[0].meter_serial, "");
    }
}
