use settings::Settings;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::adapter::homeassistant::{HomeAssistantPublisher, OFFLINE};
use crate::core::{time::Duration, unit::CubicMeter};
use crate::water::WaterMeterRunner;

mod adapter;
mod core;
mod settings;
mod water;

#[tokio::main(flavor = "multi_thread")]
pub async fn main() {
    let settings = Settings::new().expect("Error reading configuration");
    settings.monitoring.init().expect("Error initializing monitoring");

    let ha_config = settings.homeassistant.clone();
    let mut mqtt = settings
        .mqtt
        .new_client_with_last_will(ha_config.availability_topic(), OFFLINE);
    let ha_status = mqtt
        .subscribe(ha_config.status_topic())
        .await
        .expect("Error subscribing to Home Assistant status topic");

    let (event_tx, event_rx) = broadcast::channel(64);
    let cancel = CancellationToken::new();

    let mut runners = vec![];
    let mut meters = vec![];
    let mut diagnostics = vec![];

    for account in settings.accounts.iter() {
        let source = settings
            .apavital
            .new_client(&account.client_code, &account.jwt_token)
            .expect("Error creating Apavital client");

        let runner = WaterMeterRunner::new(
            &account.id,
            &account.client_code,
            Duration::minutes(account.scan_interval_minutes as i64),
            CubicMeter(account.leak_threshold),
            source,
            event_tx.clone(),
        );

        meters.push(runner.client());
        diagnostics.push((account.clone(), runner.client()));
        runners.push(tokio::spawn(runner.run(cancel.child_token())));
    }

    let publisher = HomeAssistantPublisher::new(ha_config, mqtt.sender(), meters, event_rx, ha_status);

    let http_server_exec = {
        let http_server = settings.http_server.clone();

        async move {
            http_server
                .run_server(move || vec![adapter::diagnostics::new_routes(diagnostics.clone())])
                .await
                .expect("HTTP server execution failed");
        }
    };

    tracing::info!("Starting main loop with {} water meter(s)", runners.len());

    tokio::select!(
        _ = mqtt.run() => {},
        _ = publisher.run() => {},
        _ = http_server_exec => {},
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        },
    );

    cancel.cancel();
    for result in futures::future::join_all(runners).await {
        if let Err(e) = result {
            tracing::error!("Water meter runner failed: {:?}", e);
        }
    }

    drop(event_tx);
    tracing::info!("Stopped");
}
