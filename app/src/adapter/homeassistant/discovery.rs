use serde::Serialize;

use super::{
    HomeAssistantConfig,
    config::{Attributes, Component, EntityDefinition},
};

const PAYLOAD_ON: &str = "ON";
const PAYLOAD_OFF: &str = "OFF";

#[derive(Debug, Serialize)]
pub struct DiscoveryPayload {
    name: &'static str,
    unique_id: String,
    object_id: String,
    state_topic: String,
    value_template: &'static str,
    availability: Vec<Availability>,
    availability_mode: &'static str,
    device: Device,
    icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_class: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state_class: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit_of_measurement: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    json_attributes_topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload_on: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload_off: Option<&'static str>,
    #[serde(skip_serializing_if = "is_true")]
    enabled_by_default: bool,
}

#[derive(Debug, Serialize)]
struct Availability {
    topic: String,
}

#[derive(Debug, Serialize)]
struct Device {
    identifiers: Vec<String>,
    name: String,
    manufacturer: &'static str,
    model: &'static str,
}

fn is_true(value: &bool) -> bool {
    *value
}

impl DiscoveryPayload {
    pub fn new(config: &HomeAssistantConfig, account: &str, entity: &EntityDefinition) -> Self {
        let object_id = format!("apavital_{}_{}", account, entity.key);
        let is_binary = entity.component == Component::BinarySensor;

        Self {
            name: entity.name,
            unique_id: object_id.clone(),
            object_id,
            state_topic: config.state_topic(account),
            value_template: entity.value_template,
            availability: vec![
                Availability {
                    topic: config.availability_topic(),
                },
                Availability {
                    topic: config.account_availability_topic(account),
                },
            ],
            availability_mode: "all",
            device: Device {
                identifiers: vec![format!("apavital_{}", account)],
                name: format!("Apavital {}", account),
                manufacturer: "Apavital",
                model: "Water Meter",
            },
            icon: entity.icon,
            device_class: entity.device_class,
            state_class: entity.state_class,
            unit_of_measurement: entity.unit,
            json_attributes_topic: (entity.attributes != Attributes::None)
                .then(|| config.attributes_topic(account, entity.key)),
            payload_on: is_binary.then_some(PAYLOAD_ON),
            payload_off: is_binary.then_some(PAYLOAD_OFF),
            enabled_by_default: entity.enabled_by_default,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    use super::*;
    use crate::adapter::homeassistant::config::ENTITIES;

    fn entity(key: &str) -> &'static EntityDefinition {
        ENTITIES.iter().find(|e| e.key == key).unwrap()
    }

    fn payload(key: &str) -> serde_json::Value {
        serde_json::to_value(DiscoveryPayload::new(&HomeAssistantConfig::default(), "home", entity(key))).unwrap()
    }

    #[test]
    fn water_index_sensor() {
        assert_json_eq!(
            payload("water_index"),
            json!({
                "name": "Water Index",
                "unique_id": "apavital_home_water_index",
                "object_id": "apavital_home_water_index",
                "state_topic": "apavital/home/state",
                "value_template": "{{ value_json.index }}",
                "availability": [
                    { "topic": "apavital/status" },
                    { "topic": "apavital/home/availability" },
                ],
                "availability_mode": "all",
                "device": {
                    "identifiers": ["apavital_home"],
                    "name": "Apavital home",
                    "manufacturer": "Apavital",
                    "model": "Water Meter",
                },
                "icon": "mdi:counter",
                "device_class": "water",
                "state_class": "total_increasing",
                "unit_of_measurement": "m³",
                "json_attributes_topic": "apavital/home/water_index/attributes",
            })
        );
    }

    #[test]
    fn leak_binary_sensor() {
        assert_json_eq!(
            payload("leak_detected"),
            json!({
                "name": "Water Leak",
                "unique_id": "apavital_home_leak_detected",
                "object_id": "apavital_home_leak_detected",
                "state_topic": "apavital/home/state",
                "value_template": "{{ 'ON' if value_json.leak_detected else 'OFF' }}",
                "availability": [
                    { "topic": "apavital/status" },
                    { "topic": "apavital/home/availability" },
                ],
                "availability_mode": "all",
                "device": {
                    "identifiers": ["apavital_home"],
                    "name": "Apavital home",
                    "manufacturer": "Apavital",
                    "model": "Water Meter",
                },
                "icon": "mdi:pipe-leak",
                "device_class": "moisture",
                "json_attributes_topic": "apavital/home/leak_detected/attributes",
                "payload_on": "ON",
                "payload_off": "OFF",
            })
        );
    }

    #[test]
    fn meter_serial_disabled_by_default() {
        let payload = payload("meter_serial");

        assert_eq!(payload["enabled_by_default"], json!(false));
        assert!(payload.get("json_attributes_topic").is_none());
        assert!(payload.get("unit_of_measurement").is_none());
    }
}
