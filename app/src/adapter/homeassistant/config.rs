#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Sensor,
    BinarySensor,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Sensor => "sensor",
            Component::BinarySensor => "binary_sensor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attributes {
    None,
    MeterStatistics,
    LeakAnalysis,
    LeakThreshold,
}

/// Static description of one entity exposed per account.
#[derive(Debug, Clone, Copy)]
pub struct EntityDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub component: Component,
    pub device_class: Option<&'static str>,
    pub state_class: Option<&'static str>,
    pub unit: Option<&'static str>,
    pub icon: &'static str,
    pub value_template: &'static str,
    pub enabled_by_default: bool,
    pub attributes: Attributes,
}

const VOLUME: &str = "m³";

const fn volume_sensor(
    key: &'static str,
    name: &'static str,
    state_class: &'static str,
    icon: &'static str,
    value_template: &'static str,
) -> EntityDefinition {
    EntityDefinition {
        key,
        name,
        component: Component::Sensor,
        device_class: Some("water"),
        state_class: Some(state_class),
        unit: Some(VOLUME),
        icon,
        value_template,
        enabled_by_default: true,
        attributes: Attributes::None,
    }
}

pub static ENTITIES: [EntityDefinition; 9] = [
    EntityDefinition {
        attributes: Attributes::MeterStatistics,
        ..volume_sensor(
            "water_index",
            "Water Index",
            "total_increasing",
            "mdi:counter",
            "{{ value_json.index }}",
        )
    },
    volume_sensor(
        "water_hourly",
        "Last Hour",
        "measurement",
        "mdi:water-pump",
        "{{ value_json.consumption_hourly }}",
    ),
    volume_sensor(
        "water_daily",
        "Today",
        "total",
        "mdi:water",
        "{{ value_json.consumption_daily }}",
    ),
    volume_sensor(
        "water_weekly",
        "This Week",
        "total",
        "mdi:calendar-week",
        "{{ value_json.consumption_weekly }}",
    ),
    volume_sensor(
        "water_monthly",
        "This Month",
        "total",
        "mdi:calendar-month",
        "{{ value_json.consumption_monthly }}",
    ),
    EntityDefinition {
        key: "leak_confidence",
        name: "Leak Confidence",
        component: Component::Sensor,
        device_class: None,
        state_class: Some("measurement"),
        unit: Some("%"),
        icon: "mdi:percent",
        value_template: "{{ value_json.leak_confidence }}",
        enabled_by_default: true,
        attributes: Attributes::LeakAnalysis,
    },
    EntityDefinition {
        key: "last_reading",
        name: "Last Reading",
        component: Component::Sensor,
        device_class: None,
        state_class: None,
        unit: None,
        icon: "mdi:clock-outline",
        value_template: "{{ value_json.last_reading }}",
        enabled_by_default: true,
        attributes: Attributes::None,
    },
    EntityDefinition {
        key: "meter_serial",
        name: "Meter Serial",
        component: Component::Sensor,
        device_class: None,
        state_class: None,
        unit: None,
        icon: "mdi:identifier",
        value_template: "{{ value_json.meter_serial }}",
        enabled_by_default: false,
        attributes: Attributes::None,
    },
    EntityDefinition {
        key: "leak_detected",
        name: "Water Leak",
        component: Component::BinarySensor,
        device_class: Some("moisture"),
        state_class: None,
        unit: None,
        icon: "mdi:pipe-leak",
        value_template: "{{ 'ON' if value_json.leak_detected else 'OFF' }}",
        enabled_by_default: true,
        attributes: Attributes::LeakThreshold,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<&str> = ENTITIES.iter().map(|e| e.key).collect();
        keys.sort();
        keys.dedup();

        assert_eq!(keys.len(), ENTITIES.len());
    }

    #[test]
    fn only_meter_serial_is_disabled_by_default() {
        let disabled: Vec<&str> = ENTITIES.iter().filter(|e| !e.enabled_by_default).map(|e| e.key).collect();

        assert_eq!(disabled, vec!["meter_serial"]);
    }
}
