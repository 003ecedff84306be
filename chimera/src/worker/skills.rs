//! Built-in mock skill handlers.
//!
//! None of these reach a real data source; they return canned payloads shaped
//! like the real skills' outputs so the Judge has something to grade.

use anyhow::{Result, bail};
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::core::model::{Payload, Task};
use crate::core::payload::{AnalysisParams, ContentRequest, PayloadView, PublishRequest, TrendQuery};

const SUMMARY_PREFIX_CHARS: usize = 30;

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn object(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        _ => Payload::new(),
    }
}

/// `fetch_trends`: a fixed trend list for the requested platform and region.
///
/// Every entry carries `title`, `engagement_score` in [0,1] and `source_url`.
pub fn fetch_trends(task: &Task) -> Result<Payload> {
    let query = TrendQuery::from_payload(&task.input_data)?;
    Ok(object(json!({
        "request_id": format!("tf-{}", Uuid::new_v4()),
        "generated_at": timestamp(),
        "platform": query.platform,
        "region": query.region,
        "trends": [
            {
                "title": "AI Agents 101",
                "engagement_score": 0.95,
                "source_url": "https://tiktok.com/@ai/123"
            },
            {
                "title": "Python vs Rust",
                "engagement_score": 0.82,
                "source_url": "https://youtube.com/watch?v=abc"
            }
        ]
    })))
}

/// `analyze_trends`: a canned engagement report.
pub fn analyze_trends(task: &Task) -> Result<Payload> {
    let params = AnalysisParams::from_payload(&task.input_data)?;
    if !(0.0..=1.0).contains(&params.min_engagement) {
        bail!("min_engagement {} out of range [0,1]", params.min_engagement);
    }
    Ok(object(json!({
        "analysis_report": "High engagement detected for AI topics.",
        "min_engagement": params.min_engagement,
    })))
}

/// `generate_content`: a markdown stub built from the prompt.
pub fn generate_content(task: &Task) -> Result<Payload> {
    let request = ContentRequest::from_payload(&task.input_data)?;
    let prefix: String = request.prompt.chars().take(SUMMARY_PREFIX_CHARS).collect();
    Ok(object(json!({
        "id": format!("cg-{}", Uuid::new_v4()),
        "content": format!(
            "# Generated Content\n\nBased on prompt: {}\n\nThis is a mock generation.",
            request.prompt
        ),
        "summary": format!("Content generated for: {prefix}..."),
        "tokens_used": {
            "prompt": request.prompt.chars().count(),
            "completion": 50
        },
        "metadata": request.metadata,
        "generated_at": timestamp(),
    })))
}

/// `publish`: one successful post per requested channel.
pub fn publish(task: &Task) -> Result<Payload> {
    let request = PublishRequest::from_payload(&task.input_data)?;
    let results: Vec<Value> = request
        .channels
        .iter()
        .map(|channel| {
            json!({
                "channel": channel.kind,
                "status": "success",
                "post_id": format!("post-{}", Uuid::new_v4()),
            })
        })
        .collect();
    Ok(object(json!({
        "publication_id": format!("pub-{}", Uuid::new_v4()),
        "content_id": request.content_id,
        "results": results,
        "published_at": timestamp(),
    })))
}

/// Fallback for every kind without a dedicated handler.
pub fn generic(task: &Task) -> Result<Payload> {
    Ok(object(json!({
        "message": format!("Executed generic task: {}", task.description),
    })))
}
