use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::analysis::SentimentAnalysis;
use crate::error::AnalysisError;
use crate::service::{AnalyzeParams, MAX_LIMIT, MIN_LIMIT};
use crate::storage::{AnalysisQuery, SortDirection};
use crate::window::TimeWindow;
use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default, deserialize_with = "optional_timestamp")]
    start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    sort_by_score: bool,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    skip: usize,
    #[serde(default, deserialize_with = "optional_timestamp")]
    start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    sort_by_score: bool,
    #[serde(default)]
    sort_direction: SortDirection,
}

#[derive(Debug, Serialize)]
pub struct AnalysesResponse {
    pub analyses: Vec<SentimentAnalysis>,
}

fn default_limit() -> i64 {
    25
}

/// Accepts RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS` taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", value))),
    }
}

fn checked_limit(limit: i64) -> Result<u32, AnalysisError> {
    u32::try_from(limit)
        .ok()
        .filter(|l| (MIN_LIMIT..=MAX_LIMIT).contains(l))
        .ok_or_else(|| {
            AnalysisError::InvalidArgument(format!(
                "Limit must be between {} and {}, got {}",
                MIN_LIMIT, MAX_LIMIT, limit
            ))
        })
}

fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "detail": message.into() }))).into_response()
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        if !self.is_client_error() {
            error!("Request failed: {}", self);
            return detail(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to analyze sentiment: {}", self),
            );
        }

        let status = match self {
            AnalysisError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
        detail(status, self.to_string())
    }
}

fn bad_query(rejection: QueryRejection) -> Response {
    warn!("Rejected query string: {}", rejection.body_text());
    detail(StatusCode::BAD_REQUEST, rejection.body_text())
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "Ok" }))
}

pub async fn analyze(
    State(state): State<AppState>,
    Path(subfeddit): Path<String>,
    query: Result<Query<AnalyzeQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_query(rejection),
    };

    let limit = match checked_limit(query.limit) {
        Ok(limit) => limit,
        Err(e) => return e.into_response(),
    };

    let params = AnalyzeParams {
        limit,
        start_time: query.start_time,
        end_time: query.end_time,
        sort_by_score: query.sort_by_score,
    };

    match state.service.analyze(&subfeddit, &params).await {
        Ok(analyses) => {
            info!("Returning {} analyses for '{}'", analyses.len(), subfeddit);
            Json(AnalysesResponse { analyses }).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn history(
    State(state): State<AppState>,
    Path(subfeddit): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_query(rejection),
    };

    let limit = match checked_limit(query.limit) {
        Ok(limit) => limit,
        Err(e) => return e.into_response(),
    };

    let query = AnalysisQuery {
        limit: limit as usize,
        skip: query.skip,
        window: TimeWindow::new(query.start_time, query.end_time),
        sort_by_score: query.sort_by_score,
        direction: query.sort_direction,
    };

    match state.service.history(&subfeddit, &query).await {
        Ok(analyses) => Json(AnalysesResponse { analyses }).into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_and_naive_timestamps() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T02:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn limit_bounds() {
        assert_eq!(checked_limit(1).unwrap(), 1);
        assert_eq!(checked_limit(100).unwrap(), 100);
        assert!(checked_limit(0).is_err());
        assert!(checked_limit(101).is_err());
        assert!(checked_limit(-5).is_err());
    }

    #[test]
    fn error_status_codes() {
        let status = |e: AnalysisError| e.into_response().status();

        assert_eq!(status(AnalysisError::InvalidArgument("bad".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(AnalysisError::NotFound("gone".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status(AnalysisError::Upstream(anyhow::anyhow!("timeout"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(AnalysisError::Validation(ValidationError("score out of range".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
