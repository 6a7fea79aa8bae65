use infrastructure::{MqttSender, MqttSubscription};
use tokio::sync::broadcast::{self, error::RecvError};

use super::{
    HomeAssistantConfig, OFFLINE, ONLINE,
    config::{Attributes, ENTITIES},
    discovery::DiscoveryPayload,
    state::{StatePayload, attributes_payload},
};
use crate::core::unit::CubicMeter;
use crate::water::{WaterMeterClient, WaterMeterEvent, WaterSnapshot};

type Message = (String, String);

/// Mirrors the water meters into Home Assistant via MQTT discovery.
pub struct HomeAssistantPublisher {
    config: HomeAssistantConfig,
    sender: MqttSender,
    meters: Vec<WaterMeterClient>,
    event_rx: broadcast::Receiver<WaterMeterEvent>,
    ha_status: MqttSubscription,
}

impl HomeAssistantPublisher {
    pub fn new(
        config: HomeAssistantConfig,
        sender: MqttSender,
        meters: Vec<WaterMeterClient>,
        event_rx: broadcast::Receiver<WaterMeterEvent>,
        ha_status: MqttSubscription,
    ) -> Self {
        Self {
            config,
            sender,
            meters,
            event_rx,
            ha_status,
        }
    }

    pub async fn run(mut self) {
        self.announce().await;

        loop {
            tokio::select! {
                event = self.event_rx.recv() => match event {
                    Ok(event) => self.handle_event(event).await,
                    Err(RecvError::Lagged(count)) => {
                        tracing::warn!("Missed {} water meter events, republishing all states", count);
                        for meter in self.meters.iter() {
                            self.publish_state(meter).await;
                        }
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("Water meter event channel closed, stopping Home Assistant publisher");
                        return;
                    }
                },

                Some(msg) = self.ha_status.recv() => {
                    if msg.payload_is(ONLINE) {
                        tracing::info!("Home Assistant is online, republishing discovery");
                        self.announce().await;
                    }
                }
            }
        }
    }

    async fn announce(&self) {
        self.send(self.config.availability_topic(), ONLINE.to_string()).await;

        for meter in self.meters.iter() {
            for (topic, payload) in discovery_messages(&self.config, meter.account()) {
                self.send(topic, payload).await;
            }

            self.publish_state(meter).await;
        }
    }

    async fn handle_event(&self, event: WaterMeterEvent) {
        let Some(meter) = self.meters.iter().find(|m| m.account() == event.account()) else {
            tracing::warn!("Received event for unknown water meter {}", event.account());
            return;
        };

        match event {
            WaterMeterEvent::Updated { .. } => self.publish_state(meter).await,
            WaterMeterEvent::Unavailable { .. } | WaterMeterEvent::AuthFailed { .. } => {
                self.send(self.config.account_availability_topic(meter.account()), OFFLINE.to_string())
                    .await
            }
        }
    }

    async fn publish_state(&self, meter: &WaterMeterClient) {
        let Some(snapshot) = meter.snapshot().await else {
            tracing::debug!("No data yet for water meter {}", meter.account());
            return;
        };

        let threshold = meter.diagnostics().await.leak_threshold;
        let available = meter.is_available().await;

        match state_messages(&self.config, meter.account(), &snapshot, threshold, available) {
            Ok(messages) => {
                for (topic, payload) in messages {
                    self.send(topic, payload).await;
                }
            }
            Err(e) => tracing::error!("Error serializing state of water meter {}: {:?}", meter.account(), e),
        }
    }

    async fn send(&self, topic: String, payload: String) {
        if let Err(e) = self.sender.send_retained(topic, payload).await {
            tracing::error!("Error publishing to Home Assistant: {:?}", e);
        }
    }
}

fn discovery_messages(config: &HomeAssistantConfig, account: &str) -> Vec<Message> {
    ENTITIES
        .iter()
        .filter_map(|entity| {
            let topic = config.discovery_topic(entity.component.as_str(), account, entity.key);
            match serde_json::to_string(&DiscoveryPayload::new(config, account, entity)) {
                Ok(payload) => Some((topic, payload)),
                Err(e) => {
                    tracing::error!("Error serializing discovery of {}: {:?}", entity.key, e);
                    None
                }
            }
        })
        .collect()
}

fn state_messages(
    config: &HomeAssistantConfig,
    account: &str,
    snapshot: &WaterSnapshot,
    leak_threshold: CubicMeter,
    available: bool,
) -> anyhow::Result<Vec<Message>> {
    let mut messages = vec![(
        config.state_topic(account),
        serde_json::to_string(&StatePayload::new(snapshot))?,
    )];

    for entity in ENTITIES.iter().filter(|e| e.attributes != Attributes::None) {
        if let Some(attributes) = attributes_payload(entity.attributes, snapshot, leak_threshold) {
            messages.push((
                config.attributes_topic(account, entity.key),
                serde_json::to_string(&attributes)?,
            ));
        }
    }

    //a retained snapshot from an earlier cycle must not mark a failing account online
    let availability = if available { ONLINE } else { OFFLINE };
    messages.push((config.account_availability_topic(account), availability.to_string()));

    Ok(messages)
}
