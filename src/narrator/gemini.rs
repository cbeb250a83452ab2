//! HTTP client for the narrative service's `generateContent` endpoint.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::json;

use crate::api::latency::LatencyStats;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::narrator::Narrator;

pub struct GeminiNarrator {
    client: reqwest::Client,
    url: String,
    api_key: String,
    latency: Arc<LatencyStats>,
}

impl GeminiNarrator {
    pub fn new(cfg: &Config, latency: Arc<LatencyStats>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            url: format!(
                "{}/models/{}:generateContent",
                cfg.narrator_api_url, cfg.narrator_model
            ),
            api_key: cfg.narrator_api_key.clone(),
            latency,
        })
    }
}

#[async_trait]
impl Narrator for GeminiNarrator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let started = Instant::now();
        let resp = self
            .client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Service(e.to_string()))?;
        self.latency.record(started.elapsed());

        let status = resp.status();
        // The service reports exhausted model quota on this route as 404 as
        // well as 429; both mean "back off", not "broken".
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::NOT_FOUND
        {
            return Err(AppError::RateLimited(format!(
                "narrative service returned {status}"
            )));
        }
        if !status.is_success() {
            return Err(AppError::Service(format!(
                "narrative service returned {status}"
            )));
        }

        let payload: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AppError::Service(e.to_string()))?;
        let text = payload
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .and_then(|p| p.first())
            .and_then(|p| p.get("text"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                AppError::Service("narrative response had no candidate text".to_string())
            })?;

        Ok(text.trim().to_string())
    }
}
