use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::analysis::SentimentAnalysis;
use crate::error::AnalysisError;
use super::{AnalysisQuery, AnalysisRepository, SortDirection};

/// Process-local analysis store. Data does not survive a restart.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    analyses: Arc<RwLock<Vec<SentimentAnalysis>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.analyses.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.analyses.read().await.is_empty()
    }
}

#[async_trait]
impl AnalysisRepository for MemoryRepository {
    async fn save(&self, analysis: SentimentAnalysis) -> Result<(), AnalysisError> {
        if matches!(&analysis.comment_text, Some(text) if text.trim().is_empty()) {
            error!("Refusing to store analysis {} with empty comment text", analysis.id);
            return Err(AnalysisError::InvalidArgument(
                "Comment text is required for sentiment analysis".to_string(),
            ));
        }

        let mut analyses = self.analyses.write().await;
        analyses.push(analysis);
        debug!("Stored analysis, {} total", analyses.len());
        Ok(())
    }

    async fn get_by_comment_id(&self, comment_id: i64) -> Option<SentimentAnalysis> {
        let analyses = self.analyses.read().await;
        analyses.iter().find(|a| a.comment_id == comment_id).cloned()
    }

    async fn get_by_subfeddit(&self, subfeddit_id: i64, query: &AnalysisQuery) -> Vec<SentimentAnalysis> {
        let mut matching: Vec<SentimentAnalysis> = {
            let analyses = self.analyses.read().await;
            analyses
                .iter()
                .filter(|a| a.subfeddit_id == subfeddit_id && query.window.contains(&a.created_at))
                .cloned()
                .collect()
        };

        matching.sort_by(|a, b| {
            let ordering = if query.sort_by_score {
                a.sentiment_score
                    .partial_cmp(&b.sentiment_score)
                    .unwrap_or(Ordering::Equal)
            } else {
                a.created_at.cmp(&b.created_at)
            };
            match query.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        matching.into_iter().skip(query.skip).take(query.limit).collect()
    }
}
