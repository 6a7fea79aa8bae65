use anyhow::Context as _;
use infrastructure::HttpClientConfig;
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;

use super::{ApavitalError, dto::UsageResponse};
use crate::water::{MeterUsage, UsageSource};

#[derive(Debug, Clone)]
pub struct ApavitalClient {
    client: ClientWithMiddleware,
    url: String,
    client_code: String,
}

impl ApavitalClient {
    pub fn new(url: &str, client_code: &str, jwt_token: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = HttpClientConfig::new(Some(jwt_token.to_owned()))
            .with_timeout_secs(timeout_secs)
            .new_tracing_client()
            .context("Error creating Apavital HTTP client")?;

        Ok(Self {
            client,
            url: url.to_owned(),
            client_code: client_code.to_owned(),
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_usage(&self) -> Result<MeterUsage, ApavitalError> {
        let form = [
            ("clientCode", self.client_code.as_str()),
            ("ctrAdmin", "false"),
            ("ctrEmail", ""),
        ];

        let response = self.client.post(&self.url).form(&form).send().await?;
        check_status(response.status())?;

        let usage = response.json::<UsageResponse>().await?;
        tracing::debug!("Received {} readings", usage.reading_count());

        usage.try_into()
    }
}

impl UsageSource for ApavitalClient {
    async fn fetch_usage(&self) -> Result<MeterUsage, ApavitalError> {
        self.get_usage().await
    }
}

fn check_status(status: StatusCode) -> Result<(), ApavitalError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApavitalError::Unauthorized);
    }

    if !status.is_success() {
        return Err(ApavitalError::Status(status.as_u16()));
    }

    Ok(())
}
