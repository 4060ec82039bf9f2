use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::GeminiConfig;
use super::types::Verdict;
use super::SentimentModel;

/// Scores one comment per `generateContent` call.
pub struct GeminiModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GeminiRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

const SYSTEM_PROMPT: &str = r#"You are a sentiment analysis tool for forum comments. For each comment you receive, rate its overall polarity.

- sentiment_score: a number between -1.0 (extremely negative) and 1.0 (extremely positive). Never return exactly 0.0: if the comment reads as neutral, lean to whichever side is closer, with a small magnitude such as 0.05 or -0.05.
- sentiment_label: "positive" when the score is above zero, "negative" when it is below zero. No other labels are allowed.

Respond ONLY with JSON:
{"sentiment_score": <-1.0..1.0>, "sentiment_label": "<positive|negative>"}"#;

impl GeminiModel {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build Gemini HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SentimentModel for GeminiModel {
    async fn score(&self, text: &str) -> Result<Verdict> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let request = GeminiRequest {
            system_instruction: Content {
                parts: vec![Part { text: SYSTEM_PROMPT.to_string() }],
            },
            contents: vec![Content {
                parts: vec![Part { text: format!("Comment:\n\"{}\"", text) }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 100,
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Gemini API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gemini API returned {}", status);
            anyhow::bail!("Gemini API returned {}: {}", status, body);
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let reply = gemini_resp
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.as_ref())
            .and_then(|p| p.first())
            .and_then(|p| p.text.as_ref())
            .context("Empty Gemini response")?;

        let verdict: Verdict = serde_json::from_str(reply.trim())
            .context("Failed to parse sentiment JSON from Gemini")?;

        debug!(
            "Gemini scored comment ({} chars): {} {}",
            text.len(),
            verdict.sentiment_score,
            verdict.sentiment_label
        );
        Ok(verdict)
    }
}
