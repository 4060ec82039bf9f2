use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A single post inside a subfeddit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub id: i64,
    pub subfeddit_id: i64,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Builds a comment, trimming `username` and `text`.
    pub fn new(
        id: i64,
        subfeddit_id: i64,
        username: &str,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: positive("comment id", id)?,
            subfeddit_id: positive("subfeddit id", subfeddit_id)?,
            username: non_empty("username", username)?,
            text: non_empty("text", text)?,
            created_at,
            updated_at: None,
        })
    }

    pub fn with_updated_at(mut self, updated_at: Option<DateTime<Utc>>) -> Self {
        self.updated_at = updated_at;
        self
    }
}

/// A named forum section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subfeddit {
    pub id: i64,
    pub username: String,
    pub title: String,
    pub description: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Subfeddit {
    pub fn new(id: i64, username: &str, title: &str, description: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: positive("subfeddit id", id)?,
            username: username.trim().to_string(),
            title: non_empty("title", title)?,
            description: description.to_string(),
            created_at: None,
            updated_at: None,
        })
    }
}

fn positive(field: &str, value: i64) -> Result<i64, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::new(format!("{} must be a positive integer, got {}", field, value)));
    }
    Ok(value)
}

fn non_empty(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Converts epoch seconds from the Feddit API to UTC.
pub fn from_epoch(secs: i64) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| ValidationError::new(format!("timestamp {} is out of range", secs)))
}

// Wire format of the Feddit API.

#[derive(Debug, Deserialize)]
pub(crate) struct SubfedditsPage {
    pub subfeddits: Vec<RawSubfeddit>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSubfeddit {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentsPage {
    pub comments: Vec<RawComment>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawComment {
    pub id: i64,
    pub subfeddit_id: Option<i64>,
    pub username: String,
    pub text: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl RawSubfeddit {
    pub fn into_subfeddit(self) -> Result<Subfeddit, ValidationError> {
        let mut subfeddit = Subfeddit::new(self.id, &self.username, &self.title, &self.description)?;
        subfeddit.created_at = self.created_at.map(from_epoch).transpose()?;
        subfeddit.updated_at = self.updated_at.map(from_epoch).transpose()?;
        Ok(subfeddit)
    }
}

impl RawComment {
    /// `fallback_subfeddit_id` is used when the payload omits the per-comment group id.
    pub fn into_comment(self, fallback_subfeddit_id: i64) -> Result<Comment, ValidationError> {
        let updated_at = self.updated_at.map(from_epoch).transpose()?;
        Comment::new(
            self.id,
            self.subfeddit_id.unwrap_or(fallback_subfeddit_id),
            &self.username,
            &self.text,
            from_epoch(self.created_at)?,
        )
        .map(|comment| comment.with_updated_at(updated_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn comment_fields_are_trimmed() {
        let comment = Comment::new(1, 2, "  alice ", "  hello there\n", at()).unwrap();
        assert_eq!(comment.username, "alice");
        assert_eq!(comment.text, "hello there");
    }

    #[test]
    fn comment_rejects_bad_ids_and_blank_text() {
        assert!(Comment::new(0, 1, "alice", "hi", at()).is_err());
        assert!(Comment::new(1, -3, "alice", "hi", at()).is_err());
        assert!(Comment::new(1, 1, "   ", "hi", at()).is_err());
        let err = Comment::new(1, 1, "alice", " \t ", at()).unwrap_err();
        assert!(err.to_string().contains("text"));
    }

    #[test]
    fn subfeddit_requires_title() {
        assert!(Subfeddit::new(1, "owner", "", "desc").is_err());
        assert!(Subfeddit::new(0, "owner", "Dummy", "desc").is_err());
        let subfeddit = Subfeddit::new(1, "owner", " Dummy Topic 1 ", "").unwrap();
        assert_eq!(subfeddit.title, "Dummy Topic 1");
    }

    #[test]
    fn raw_comment_converts_epoch_seconds() {
        let raw = RawComment {
            id: 7,
            subfeddit_id: None,
            username: "bob".into(),
            text: "Nice".into(),
            created_at: 1_704_110_400,
            updated_at: Some(1_704_110_460),
        };
        let comment = raw.into_comment(3).unwrap();
        assert_eq!(comment.subfeddit_id, 3);
        assert_eq!(comment.created_at, at());
        assert_eq!(comment.updated_at, Some(at() + chrono::Duration::minutes(1)));
    }

    #[test]
    fn raw_subfeddit_from_json() {
        let page: SubfedditsPage = serde_json::from_str(
            r#"{"subfeddits":[{"id":1,"username":"admin_1","title":"Dummy Topic 1","description":"Dummy Topic 1"}],"skip":0,"limit":10}"#,
        )
        .unwrap();
        let subfeddit = page.subfeddits.into_iter().next().unwrap().into_subfeddit().unwrap();
        assert_eq!(subfeddit.id, 1);
        assert_eq!(subfeddit.title, "Dummy Topic 1");
        assert!(subfeddit.created_at.is_none());
    }
}
