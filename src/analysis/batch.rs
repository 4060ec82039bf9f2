use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::try_join_all;
use tracing::{error, info, warn};

use crate::error::AnalysisError;
use crate::feddit::Comment;
use super::label::SentimentLabel;
use super::types::SentimentAnalysis;
use super::{SentimentClassifier, SentimentModel};

/// Runs a [`SentimentModel`] over comments in fixed-size chunks.
///
/// Chunks run one after another; the calls inside a chunk run concurrently.
/// The first failing call aborts the whole batch and drops its in-flight
/// siblings, so callers either get every analysis or none.
pub struct BatchClassifier {
    model: Arc<dyn SentimentModel>,
    batch_size: usize,
}

impl BatchClassifier {
    pub fn new(model: Arc<dyn SentimentModel>, batch_size: usize) -> Self {
        Self {
            model,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    async fn classify_one(&self, comment: &Comment) -> Result<SentimentAnalysis, AnalysisError> {
        let verdict = self.model.score(&comment.text).await.map_err(|e| {
            error!("Failed to classify comment {}: {:#}", comment.id, e);
            AnalysisError::Upstream(e.context(format!("classifying comment {}", comment.id)))
        })?;

        let label: SentimentLabel = verdict.sentiment_label.parse()?;
        let analysis = SentimentAnalysis::new(
            comment.id,
            comment.id,
            Some(comment.text.clone()),
            comment.subfeddit_id,
            verdict.sentiment_score,
            label,
            Utc::now(),
        )
        .inspect_err(|e| error!("Model verdict for comment {} rejected: {}", comment.id, e))?;

        Ok(analysis)
    }
}

#[async_trait]
impl SentimentClassifier for BatchClassifier {
    async fn classify(&self, comments: &[Comment]) -> Result<Vec<SentimentAnalysis>, AnalysisError> {
        if comments.is_empty() {
            return Ok(Vec::new());
        }

        let mut batch_size = self.batch_size;
        if batch_size > comments.len() {
            warn!(
                "Batch size {} exceeds input of {} comments, clamping",
                batch_size,
                comments.len()
            );
            batch_size = comments.len();
        }

        info!(
            "Classifying {} comments in batches of {}",
            comments.len(),
            batch_size
        );

        let mut analyses = Vec::with_capacity(comments.len());
        for (index, chunk) in comments.chunks(batch_size).enumerate() {
            let results = try_join_all(chunk.iter().map(|comment| self.classify_one(comment))).await?;
            info!("Batch {} done ({} comments)", index + 1, results.len());
            analyses.extend(results);
        }

        Ok(analyses)
    }
}
