pub mod batch;
pub mod gemini;
pub mod label;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::feddit::Comment;

pub use batch::BatchClassifier;
pub use gemini::GeminiModel;
pub use label::SentimentLabel;
pub use types::{SentimentAnalysis, Verdict};

/// One language-model call scoring a single piece of text.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    async fn score(&self, text: &str) -> Result<Verdict>;
}

/// Classifies a list of comments, returning one analysis per comment in input order.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, comments: &[Comment]) -> Result<Vec<SentimentAnalysis>, AnalysisError>;
}
