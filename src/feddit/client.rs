use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};

use crate::config::FedditConfig;
use super::types::{Comment, CommentsPage, Subfeddit, SubfedditsPage};
use super::CommentSource;

/// HTTP client for the Feddit comment API.
pub struct FedditClient {
    client: Client,
    base_url: String,
}

impl FedditClient {
    pub fn new(config: &FedditConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build Feddit HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Feddit request to {} failed", path))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Feddit API returned {} for {}: {}", status, path, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse Feddit response from {}", path))
    }
}

#[async_trait]
impl CommentSource for FedditClient {
    async fn subfeddits(&self, limit: u32, skip: u32) -> Result<Vec<Subfeddit>> {
        info!("Fetching subfeddits (limit: {}, skip: {})", limit, skip);

        let page: SubfedditsPage = self
            .get(
                "/api/v1/subfeddits/",
                &[("limit", limit.to_string()), ("skip", skip.to_string())],
            )
            .await
            .inspect_err(|e| error!("Failed to fetch subfeddits: {:#}", e))?;

        let subfeddits = page
            .subfeddits
            .into_iter()
            .map(|raw| raw.into_subfeddit())
            .collect::<Result<Vec<_>, _>>()
            .context("Feddit returned an invalid subfeddit")?;

        info!("Fetched {} subfeddits", subfeddits.len());
        Ok(subfeddits)
    }

    async fn comments(&self, subfeddit_id: i64, limit: u32, skip: u32) -> Result<Vec<Comment>> {
        info!(
            "Fetching comments for subfeddit {} (limit: {}, skip: {})",
            subfeddit_id, limit, skip
        );

        let page: CommentsPage = self
            .get(
                "/api/v1/comments/",
                &[
                    ("subfeddit_id", subfeddit_id.to_string()),
                    ("limit", limit.to_string()),
                    ("skip", skip.to_string()),
                ],
            )
            .await
            .inspect_err(|e| error!("Failed to fetch comments for subfeddit {}: {:#}", subfeddit_id, e))?;

        let comments = page
            .comments
            .into_iter()
            .map(|raw| raw.into_comment(subfeddit_id))
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Feddit returned an invalid comment for subfeddit {}", subfeddit_id))?;

        info!("Fetched {} comments for subfeddit {}", comments.len(), subfeddit_id);
        Ok(comments)
    }
}
