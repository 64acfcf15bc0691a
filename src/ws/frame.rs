use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::errors::KucoinError;

/// Outbound subscribe/unsubscribe frame.
#[derive(Debug, Serialize)]
pub struct SubscribeFrame {
    pub id: String,
    #[serde(rename = "type")]
    pub frame_type: &'static str,
    pub topic: String,
    #[serde(rename = "privateChannel")]
    pub private_channel: bool,
    pub response: bool,
}

impl SubscribeFrame {
    pub fn subscribe(id: String, topic: String, private_channel: bool) -> Self {
        Self {
            id,
            frame_type: "subscribe",
            topic,
            private_channel,
            response: true,
        }
    }

    pub fn unsubscribe(id: String, topic: String, private_channel: bool) -> Self {
        Self {
            id,
            frame_type: "unsubscribe",
            topic,
            private_channel,
            response: true,
        }
    }
}

/// Outbound ping frame.
#[derive(Debug, Serialize)]
pub struct PingFrame {
    pub id: String,
    #[serde(rename = "type")]
    pub frame_type: &'static str,
}

impl PingFrame {
    pub fn new(id: String) -> Self {
        Self {
            id,
            frame_type: "ping",
        }
    }
}

/// Inbound gateway frame. `topic`, `subject` and `data` are present on data
/// messages only; `id` correlates acks and pongs.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub frame_type: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub code: Option<Value>,
}

impl InboundFrame {
    pub fn parse(text: &str) -> Result<Self, KucoinError> {
        serde_json::from_str(text).map_err(KucoinError::from)
    }
}

/// A decoded event as delivered to a subscriber callback.
#[derive(Debug, Clone)]
pub struct WsEvent<T> {
    pub topic: String,
    pub subject: Option<String>,
    pub data: T,
}

impl InboundFrame {
    /// Decode the data payload of a message frame into a typed event.
    pub fn typed<T: DeserializeOwned>(&self) -> Result<WsEvent<T>, KucoinError> {
        let data = self.data.clone().unwrap_or(Value::Null);
        let data: T = serde_json::from_value(data)?;
        Ok(WsEvent {
            topic: self.topic.clone().unwrap_or_default(),
            subject: self.subject.clone(),
            data,
        })
    }
}
