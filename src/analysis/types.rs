use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use super::label::SentimentLabel;

/// Classification result for one comment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentAnalysis {
    /// Reuses the analyzed comment's id.
    pub id: i64,
    pub comment_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_text: Option<String>,
    pub subfeddit_id: i64,
    /// -1.0 (negative) to 1.0 (positive), never exactly 0.0
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub created_at: DateTime<Utc>,
}

impl SentimentAnalysis {
    pub fn new(
        id: i64,
        comment_id: i64,
        comment_text: Option<String>,
        subfeddit_id: i64,
        sentiment_score: f64,
        sentiment_label: SentimentLabel,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let analysis = Self {
            id,
            comment_id,
            comment_text,
            subfeddit_id,
            sentiment_score,
            sentiment_label,
            created_at,
        };
        analysis.validate()?;
        Ok(analysis)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("id", self.id),
            ("comment_id", self.comment_id),
            ("subfeddit_id", self.subfeddit_id),
        ] {
            if value <= 0 {
                return Err(ValidationError::new(format!("{} must be positive, got {}", field, value)));
            }
        }

        if matches!(&self.comment_text, Some(text) if text.trim().is_empty()) {
            return Err(ValidationError::new("comment text cannot be empty"));
        }

        if !(-1.0..=1.0).contains(&self.sentiment_score) {
            return Err(ValidationError::new(format!(
                "sentiment score {} is outside [-1.0, 1.0]",
                self.sentiment_score
            )));
        }

        let expected = SentimentLabel::from_score(self.sentiment_score)?;
        if expected != self.sentiment_label {
            return Err(ValidationError::new(format!(
                "score-label mismatch: score {} labeled {}",
                self.sentiment_score, self.sentiment_label
            )));
        }

        Ok(())
    }
}

/// Raw verdict returned by the language model for one comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub sentiment_score: f64,
    pub sentiment_label: String,
}
