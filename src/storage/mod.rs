pub mod memory;

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::analysis::SentimentAnalysis;
use crate::error::AnalysisError;
use crate::window::TimeWindow;

pub use memory::MemoryRepository;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    /// Case-insensitive `asc` / `desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{}', expected 'asc' or 'desc'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for SortDirection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Filter, ordering and page for [`AnalysisRepository::get_by_subfeddit`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisQuery {
    pub limit: usize,
    pub skip: usize,
    pub window: TimeWindow,
    /// Order by score instead of creation time.
    pub sort_by_score: bool,
    pub direction: SortDirection,
}

impl Default for AnalysisQuery {
    fn default() -> Self {
        Self {
            limit: 25,
            skip: 0,
            window: TimeWindow::default(),
            sort_by_score: false,
            direction: SortDirection::Desc,
        }
    }
}

/// Storage for sentiment analyses. Records are append-only.
#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    async fn save(&self, analysis: SentimentAnalysis) -> Result<(), AnalysisError>;

    /// First saved analysis for the comment, if any.
    async fn get_by_comment_id(&self, comment_id: i64) -> Option<SentimentAnalysis>;

    async fn get_by_subfeddit(&self, subfeddit_id: i64, query: &AnalysisQuery) -> Vec<SentimentAnalysis>;
}
