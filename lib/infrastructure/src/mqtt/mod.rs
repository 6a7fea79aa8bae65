mod client;
mod receiver;
mod sender;

pub use client::Mqtt;
pub use receiver::{MqttInMessage, MqttSubscription};
pub use sender::MqttSender;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct MqttConfig {
    host: String,
    port: u16,
    client_id: String,
    username: Option<String>,
    password: Option<String>,
}

impl MqttConfig {
    pub fn new_client(&self) -> Mqtt {
        Mqtt::connect(&self.host, self.port, &self.client_id, self.credentials())
    }

    //broker publishes the retained will payload when the connection drops
    pub fn new_client_with_last_will(&self, will_topic: String, will_payload: &'static str) -> Mqtt {
        Mqtt::connect_with_last_will(
            &self.host,
            self.port,
            &self.client_id,
            self.credentials(),
            will_topic,
            will_payload,
        )
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }
}
