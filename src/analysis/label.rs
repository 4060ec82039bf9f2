use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Binary sentiment categories. The sign of the score decides the label; a
/// score of exactly zero has no label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    pub fn label(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
        }
    }

    pub fn from_score(score: f64) -> Result<Self, ValidationError> {
        if score > 0.0 {
            Ok(SentimentLabel::Positive)
        } else if score < 0.0 {
            Ok(SentimentLabel::Negative)
        } else {
            Err(ValidationError::new(format!(
                "score {} has no label under binary classification",
                score
            )))
        }
    }

    pub fn all() -> &'static [SentimentLabel] {
        &[SentimentLabel::Positive, SentimentLabel::Negative]
    }
}

impl FromStr for SentimentLabel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            other => Err(ValidationError::new(format!("unknown sentiment label '{}'", other))),
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
