mod config;
mod discovery;
mod publisher;
mod state;

pub use publisher::HomeAssistantPublisher;

use serde::Deserialize;

pub const ONLINE: &str = "online";
pub const OFFLINE: &str = "offline";

#[derive(Debug, Deserialize, Clone)]
pub struct HomeAssistantConfig {
    #[serde(default = "default_discovery_prefix")]
    pub discovery_prefix: String,
    #[serde(default = "default_base_topic")]
    pub base_topic: String,
}

impl Default for HomeAssistantConfig {
    fn default() -> Self {
        Self {
            discovery_prefix: default_discovery_prefix(),
            base_topic: default_base_topic(),
        }
    }
}

impl HomeAssistantConfig {
    pub fn status_topic(&self) -> String {
        format!("{}/status", self.discovery_prefix)
    }

    pub fn availability_topic(&self) -> String {
        format!("{}/status", self.base_topic)
    }

    pub fn account_availability_topic(&self, account: &str) -> String {
        format!("{}/{}/availability", self.base_topic, account)
    }

    pub fn state_topic(&self, account: &str) -> String {
        format!("{}/{}/state", self.base_topic, account)
    }

    pub fn attributes_topic(&self, account: &str, key: &str) -> String {
        format!("{}/{}/{}/attributes", self.base_topic, account, key)
    }

    pub fn discovery_topic(&self, component: &str, account: &str, key: &str) -> String {
        format!("{}/{}/apavital_{}/{}/config", self.discovery_prefix, component, account, key)
    }
}

fn default_discovery_prefix() -> String {
    "homeassistant".to_string()
}

fn default_base_topic() -> String {
    "apavital".to_string()
}
