mod client;
mod dto;

pub use client::ApavitalClient;

use derive_more::derive::{Display, Error, From};
use serde::Deserialize;

#[derive(Debug, Display, Error, From)]
pub enum ApavitalError {
    #[display("JWT token expired")]
    Unauthorized,

    #[display("Unexpected HTTP status {_0}")]
    Status(#[error(not(source))] u16),

    #[from]
    #[display("Request failed: {_0}")]
    Request(reqwest_middleware::Error),

    #[from]
    #[display("Error reading response: {_0}")]
    Response(reqwest::Error),

    #[display("Malformed meter index {_0}")]
    MalformedIndex(#[error(not(source))] String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApavitalConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ApavitalConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ApavitalConfig {
    pub fn new_client(&self, client_code: &str, jwt_token: &str) -> anyhow::Result<ApavitalClient> {
        ApavitalClient::new(&self.api_url, client_code, jwt_token, self.request_timeout_secs)
    }
}

fn default_api_url() -> String {
    "https://my.apavital.ro/api/get_usage".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}
