use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::analysis::{SentimentAnalysis, SentimentClassifier};
use crate::error::AnalysisError;
use crate::feddit::{CommentSource, Subfeddit};
use crate::storage::{AnalysisQuery, AnalysisRepository};
use crate::window::TimeWindow;

pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 100;

/// Parameters for [`SentimentService::analyze`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzeParams {
    pub limit: u32,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub sort_by_score: bool,
}

impl Default for AnalyzeParams {
    fn default() -> Self {
        Self {
            limit: 25,
            start_time: None,
            end_time: None,
            sort_by_score: false,
        }
    }
}

/// Fetch, filter, classify and persist pipeline for one subfeddit at a time.
pub struct SentimentService {
    source: Arc<dyn CommentSource>,
    classifier: Arc<dyn SentimentClassifier>,
    repository: Arc<dyn AnalysisRepository>,
    subfeddit_page_size: u32,
}

impl SentimentService {
    pub fn new(
        source: Arc<dyn CommentSource>,
        classifier: Arc<dyn SentimentClassifier>,
        repository: Arc<dyn AnalysisRepository>,
        subfeddit_page_size: u32,
    ) -> Self {
        Self {
            source,
            classifier,
            repository,
            subfeddit_page_size,
        }
    }

    /// Analyzes up to `params.limit` recent comments of the subfeddit titled `title`.
    ///
    /// Every returned analysis has been stored. Without `sort_by_score` the
    /// results stay in classifier order, which mirrors the source's comment
    /// order; they are not re-sorted by creation time. With it, highest score
    /// comes first.
    pub async fn analyze(&self, title: &str, params: &AnalyzeParams) -> Result<Vec<SentimentAnalysis>, AnalysisError> {
        validate_limit(params.limit)?;
        info!(
            "Analyzing subfeddit '{}' (limit: {}, start: {:?}, end: {:?}, sort_by_score: {})",
            title, params.limit, params.start_time, params.end_time, params.sort_by_score
        );

        let subfeddit = self.resolve(title).await?;
        self.analyze_subfeddit(&subfeddit, params).await
    }

    /// Previously stored analyses for the subfeddit titled `title`. Classifies nothing.
    pub async fn history(&self, title: &str, query: &AnalysisQuery) -> Result<Vec<SentimentAnalysis>, AnalysisError> {
        let limit = u32::try_from(query.limit).unwrap_or(u32::MAX);
        validate_limit(limit)?;

        let subfeddit = self.resolve(title).await?;
        let analyses = self.repository.get_by_subfeddit(subfeddit.id, query).await;
        info!(
            "Loaded {} stored analyses for subfeddit '{}' ({})",
            analyses.len(),
            subfeddit.title,
            subfeddit.id
        );
        Ok(analyses)
    }

    /// Runs the pipeline for every subfeddit on the first lookup page. Failures
    /// in one subfeddit are logged and skipped. Returns the number of analyses stored.
    pub async fn analyze_all(&self, params: &AnalyzeParams) -> Result<usize, AnalysisError> {
        validate_limit(params.limit)?;

        let subfeddits = self.list_subfeddits().await?;
        let mut stored = 0;
        for subfeddit in &subfeddits {
            match self.analyze_subfeddit(subfeddit, params).await {
                Ok(analyses) => stored += analyses.len(),
                Err(e) => error!(
                    "Failed to analyze subfeddit '{}' ({}): {}",
                    subfeddit.title, subfeddit.id, e
                ),
            }
        }

        info!("Swept {} subfeddits, stored {} analyses", subfeddits.len(), stored);
        Ok(stored)
    }

    /// Exact title match against the first lookup page; the first match wins.
    pub async fn resolve(&self, title: &str) -> Result<Subfeddit, AnalysisError> {
        if title.trim().is_empty() {
            return Err(AnalysisError::InvalidArgument("Subfeddit title must not be empty".to_string()));
        }

        let subfeddits = self.list_subfeddits().await?;
        let mut matching = subfeddits.into_iter().filter(|s| s.title == title);

        let subfeddit = matching.next().ok_or_else(|| {
            warn!("Subfeddit '{}' not found", title);
            AnalysisError::NotFound(format!("Subfeddit '{}' not found", title))
        })?;

        let duplicates = matching.count();
        if duplicates > 0 {
            warn!(
                "{} other subfeddits share the title '{}', using id {}",
                duplicates, title, subfeddit.id
            );
        }

        Ok(subfeddit)
    }

    async fn list_subfeddits(&self) -> Result<Vec<Subfeddit>, AnalysisError> {
        self.source
            .subfeddits(self.subfeddit_page_size, 0)
            .await
            .map_err(|e| {
                error!("Failed to list subfeddits: {:#}", e);
                AnalysisError::Upstream(e)
            })
    }

    async fn analyze_subfeddit(
        &self,
        subfeddit: &Subfeddit,
        params: &AnalyzeParams,
    ) -> Result<Vec<SentimentAnalysis>, AnalysisError> {
        let mut comments = self
            .source
            .comments(subfeddit.id, params.limit, 0)
            .await
            .map_err(|e| {
                error!("Failed to fetch comments for subfeddit {}: {:#}", subfeddit.id, e);
                AnalysisError::Upstream(e)
            })?;
        // The source should honor the limit; never hand out more than asked for.
        comments.truncate(params.limit as usize);
        info!("Fetched {} comments for subfeddit {}", comments.len(), subfeddit.id);

        let window = TimeWindow::new(params.start_time, params.end_time);
        if window.is_bounded() {
            comments.retain(|c| {
                let keep = window.contains(&c.created_at);
                debug!("Comment {} at {} in window: {}", c.id, c.created_at, keep);
                keep
            });
            info!("{} comments left after time filter", comments.len());
        }

        if comments.is_empty() {
            info!("No comments to analyze for subfeddit {}", subfeddit.id);
            return Ok(Vec::new());
        }

        let mut analyses = self.classifier.classify(&comments).await.inspect_err(|e| {
            error!("Classification failed for subfeddit {}: {}", subfeddit.id, e)
        })?;

        for analysis in &analyses {
            self.repository.save(analysis.clone()).await.inspect_err(|e| {
                error!("Failed to store analysis for comment {}: {}", analysis.comment_id, e)
            })?;
        }

        if params.sort_by_score {
            analyses.sort_by(|a, b| {
                b.sentiment_score
                    .partial_cmp(&a.sentiment_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        info!(
            "Analyzed {} comments for subfeddit '{}' ({})",
            analyses.len(),
            subfeddit.title,
            subfeddit.id
        );
        Ok(analyses)
    }
}

fn validate_limit(limit: u32) -> Result<(), AnalysisError> {
    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(AnalysisError::InvalidArgument(format!(
            "Limit must be between {} and {}, got {}",
            MIN_LIMIT, MAX_LIMIT, limit
        )));
    }
    Ok(())
}
