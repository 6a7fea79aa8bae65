use std::sync::Arc;

use actix_web::{HttpResponse, ResponseError, web};
use derive_more::derive::{Display, Error};
use serde::Serialize;
use serde_json::Value;

use crate::settings::AccountConfig;
use crate::water::{Diagnostics, WaterMeterClient};

const REDACTED: &str = "**REDACTED**";
const TO_REDACT: [&str; 3] = ["client_code", "jwt_token", "meter_serial"];

struct Meter {
    config: AccountConfig,
    client: WaterMeterClient,
}

struct Meters(Vec<Meter>);

pub fn new_routes(meters: Vec<(AccountConfig, WaterMeterClient)>) -> actix_web::Scope {
    let meters = Arc::new(Meters(
        meters
            .into_iter()
            .map(|(config, client)| Meter { config, client })
            .collect(),
    ));

    web::scope("/api/diagnostics")
        .app_data(web::Data::from(meters))
        .route("", web::get().to(get_all))
        .route("/{account}", web::get().to(get_account))
}

type DiagnosticsResponse = Result<HttpResponse, DiagnosticsApiError>;

#[derive(Debug, Error, Display)]
enum DiagnosticsApiError {
    #[display("Internal error")]
    InternalError(serde_json::Error),

    #[display("Not found")]
    NotFound,
}

impl ResponseError for DiagnosticsApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        tracing::warn!("DiagnosticsApiError: {:?}", self);

        match self {
            DiagnosticsApiError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct MeterReport {
    account: String,
    config: Value,
    runner: Diagnostics,
    data: Option<Value>,
}

async fn get_all(meters: web::Data<Meters>) -> DiagnosticsResponse {
    let mut reports = vec![];
    for meter in meters.0.iter() {
        reports.push(report(meter).await?);
    }

    Ok(HttpResponse::Ok().json(reports))
}

async fn get_account(meters: web::Data<Meters>, path: web::Path<String>) -> DiagnosticsResponse {
    let account = path.into_inner();
    let meter = meters
        .0
        .iter()
        .find(|m| m.config.id == account)
        .ok_or(DiagnosticsApiError::NotFound)?;

    Ok(HttpResponse::Ok().json(report(meter).await?))
}

async fn report(meter: &Meter) -> Result<MeterReport, DiagnosticsApiError> {
    let config = serde_json::to_value(&meter.config).map_err(DiagnosticsApiError::InternalError)?;

    let data = match meter.client.snapshot().await {
        Some(snapshot) => Some(redact(
            serde_json::to_value(&snapshot).map_err(DiagnosticsApiError::InternalError)?,
        )),
        None => None,
    };

    Ok(MeterReport {
        account: meter.config.id.clone(),
        config: redact(config),
        runner: meter.client.diagnostics().await,
        data,
    })
}

fn redact(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    let value = if TO_REDACT.contains(&key.as_str()) {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact(value)
                    };
                    (key, value)
                })
                .collect(),
        ),
        Value::Array(values) => Value::Array(values.into_iter().map(redact).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test as actix_test};
    use assert_json_diff::assert_json_include;
    use serde_json::json;
    use tokio::sync::broadcast;

    use super::*;
    use crate::adapter::apavital::ApavitalConfig;
    use crate::core::unit::CubicMeter;
    use crate::t;
    use crate::water::WaterMeterRunner;

    #[test]
    fn redacts_nested_keys() {
        let redacted = redact(json!({
            "client_code": "123456789",
            "index": 12.5,
            "readings": [ { "index": 12.5, "meter_serial": "AB1" } ],
        }));

        assert_eq!(
            redacted,
            json!({
                "client_code": "**REDACTED**",
                "index": 12.5,
                "readings": [ { "index": 12.5, "meter_serial": "**REDACTED**" } ],
            })
        );
    }

    fn meter() -> (AccountConfig, WaterMeterClient) {
        let config = AccountConfig {
            id: "home".to_string(),
            client_code: "123456789".to_string(),
            jwt_token: "secret-token".to_string(),
            scan_interval_minutes: 60,
            leak_threshold: 0.1,
        };
        let source = ApavitalConfig::default()
            .new_client(&config.client_code, &config.jwt_token)
            .unwrap();
        let runner = WaterMeterRunner::new(
            &config.id,
            &config.client_code,
            t!(60 minutes),
            CubicMeter(config.leak_threshold),
            source,
            broadcast::channel(1).0,
        );

        (config, runner.client())
    }

    #[actix_web::test]
    async fn account_report_hides_credentials() {
        let app = actix_test::init_service(App::new().service(new_routes(vec![meter()]))).await;

        let req = actix_test::TestRequest::get().uri("/api/diagnostics/home").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_json_include!(
            actual: body,
            expected: json!({
                "account": "home",
                "config": {
                    "id": "home",
                    "client_code": "**REDACTED**",
                    "jwt_token": "**REDACTED**",
                    "scan_interval_minutes": 60,
                },
                "runner": {
                    "client_code": "1234****",
                    "api_calls_count": 0,
                    "consecutive_errors": 0,
                    "last_error": null,
                    "update_interval_minutes": 60,
                },
                "data": null,
            })
        );
    }

    #[actix_web::test]
    async fn all_accounts() {
        let app = actix_test::init_service(App::new().service(new_routes(vec![meter()]))).await;

        let req = actix_test::TestRequest::get().uri("/api/diagnostics").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn unknown_account_is_not_found() {
        let app = actix_test::init_service(App::new().service(new_routes(vec![meter()]))).await;

        let req = actix_test::TestRequest::get().uri("/api/diagnostics/cabin").to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
