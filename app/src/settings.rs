use std::collections::HashSet;

use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use infrastructure::{HttpServerConfig, MonitoringConfig, MqttConfig};
use serde::{Deserialize, Serialize};

use crate::adapter::{apavital::ApavitalConfig, homeassistant::HomeAssistantConfig};

const SCAN_INTERVAL_MINUTES: std::ops::RangeInclusive<u64> = 15..=1440;
const LEAK_THRESHOLD: std::ops::RangeInclusive<f64> = 0.01..=1.0;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub monitoring: MonitoringConfig,
    pub mqtt: MqttConfig,
    pub http_server: HttpServerConfig,
    #[serde(default)]
    pub apavital: ApavitalConfig,
    #[serde(default)]
    pub homeassistant: HomeAssistantConfig,
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

/// One utility account, polled independently.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
    pub id: String,
    pub client_code: String,
    pub jwt_token: String,
    #[serde(default = "default_scan_interval_minutes")]
    pub scan_interval_minutes: u64,
    #[serde(default = "default_leak_threshold")]
    pub leak_threshold: f64,
}

fn default_scan_interval_minutes() -> u64 {
    60
}

fn default_leak_threshold() -> f64 {
    0.1
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(Config::builder().add_source(File::with_name("config.toml")))
    }

    fn load(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder
            .add_source(Environment::with_prefix("APAVITAL").separator("__"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.accounts.is_empty() {
            return Err(ConfigError::Message("At least one account must be configured".to_owned()));
        }

        let mut ids = HashSet::new();
        for account in self.accounts.iter() {
            account.validate()?;

            if !ids.insert(account.id.as_str()) {
                return Err(ConfigError::Message(format!("Duplicate account id {}", account.id)));
            }
        }

        Ok(())
    }
}

impl AccountConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::Message(format!("Account {:?}: {}", self.id, reason)));

        if self.id.trim().is_empty() || !self.id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return invalid("id must be non-empty and contain only letters, digits, '_' or '-'".to_owned());
        }

        if self.client_code.trim().is_empty() {
            return invalid("client_code must not be empty".to_owned());
        }

        if self.jwt_token.trim().is_empty() {
            return invalid("jwt_token must not be empty".to_owned());
        }

        if !SCAN_INTERVAL_MINUTES.contains(&self.scan_interval_minutes) {
            return invalid(format!(
                "scan_interval_minutes {} outside {:?}",
                self.scan_interval_minutes, SCAN_INTERVAL_MINUTES
            ));
        }

        if !LEAK_THRESHOLD.contains(&self.leak_threshold) {
            return invalid(format!("leak_threshold {} outside {:?}", self.leak_threshold, LEAK_THRESHOLD));
        }

        Ok(())
    }
}
