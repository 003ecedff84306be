//! Typed views over the open task payloads.
//!
//! Payloads stay open maps on the wire so unknown task kinds keep working.
//! Handlers for known kinds decode their inputs through these views and treat
//! a decode failure as a handler failure.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::model::Payload;

/// Conversion between a typed payload and its open-map form.
pub trait PayloadView: Sized + Serialize + DeserializeOwned {
    fn into_payload(self) -> Payload;

    fn from_payload(payload: &Payload) -> Result<Self> {
        serde_json::from_value(Value::Object(payload.clone()))
            .with_context(|| format!("decode {}", std::any::type_name::<Self>()))
    }
}

/// Input of a `fetch_trends` task. Missing fields fall back to TikTok/US.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendQuery {
    pub platform: String,
    pub region: String,
}

impl Default for TrendQuery {
    fn default() -> Self {
        Self {
            platform: "tiktok".to_string(),
            region: "US".to_string(),
        }
    }
}

impl PayloadView for TrendQuery {
    fn into_payload(self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("platform".to_string(), Value::String(self.platform));
        payload.insert("region".to_string(), Value::String(self.region));
        payload
    }
}

/// Input of an `analyze_trends` task. A missing threshold defaults to 0.5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    pub min_engagement: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            min_engagement: 0.5,
        }
    }
}

impl PayloadView for AnalysisParams {
    fn into_payload(self) -> Payload {
        let mut payload = Payload::new();
        payload.insert(
            "min_engagement".to_string(),
            Value::from(self.min_engagement),
        );
        payload
    }
}

/// Input of a `generate_content` task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub metadata: Payload,
}

impl PayloadView for ContentRequest {
    fn into_payload(self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("prompt".to_string(), Value::String(self.prompt));
        payload.insert("metadata".to_string(), Value::Object(self.metadata));
        payload
    }
}

/// Publication target of a `publish` task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(rename = "type", default = "unknown_channel")]
    pub kind: String,
}

fn unknown_channel() -> String {
    "unknown".to_string()
}

/// Input of a `publish` task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    #[serde(default)]
    pub content_id: Option<String>,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl PayloadView for PublishRequest {
    fn into_payload(self) -> Payload {
        let mut payload = Payload::new();
        if let Some(content_id) = self.content_id {
            payload.insert("content_id".to_string(), Value::String(content_id));
        }
        let channels = self
            .channels
            .into_iter()
            .map(|channel| {
                let mut entry = Payload::new();
                entry.insert("type".to_string(), Value::String(channel.kind));
                Value::Object(entry)
            })
            .collect();
        payload.insert("channels".to_string(), Value::Array(channels));
        payload
    }
}
