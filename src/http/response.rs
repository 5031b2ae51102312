//! Response construction.
//!
//! # Responsibilities
//! - Map query outcomes to status codes (400 client error, 404 no match)
//! - Attach `ETag` / `Last-Modified` to every tree response
//! - Answer conditional requests with 304 Not Modified
//!
//! # Design Decisions
//! - Error bodies are JSON objects with a single `error` field
//! - The ETag covers exactly the JSON payload that would be sent

use axum::http::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::caching::{EtagGenerator, Freshness, Preconditions, Validators};
use crate::matching::{MatchResult, QueryError};
use crate::tree::{Parameter, PATH_SEPARATOR};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    BadRequest(#[from] QueryError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// One resolved search as sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResultBody {
    pub parameters: Vec<Parameter>,
    /// `level=term&...` of the matched path, `/` for the root.
    pub matched: String,
}

impl From<&MatchResult> for SearchResultBody {
    fn from(result: &MatchResult) -> Self {
        let matched = if result.is_root() {
            PATH_SEPARATOR.to_string()
        } else {
            result.matched()
        };
        Self {
            parameters: result.parameters().to_vec(),
            matched,
        }
    }
}

/// A single search yields an object, a batch an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchPayload {
    One(SearchResultBody),
    Many(Vec<SearchResultBody>),
}

impl SearchPayload {
    pub fn from_results(results: &[MatchResult]) -> Self {
        match results {
            [single] => SearchPayload::One(single.into()),
            _ => SearchPayload::Many(results.iter().map(SearchResultBody::from).collect()),
        }
    }
}

/// JSON response with validators, or 304 if the client's copy is current.
pub fn conditional_json<T: Serialize>(
    etags: &EtagGenerator,
    headers: &HeaderMap,
    payload: &T,
    last_modified: Option<DateTime<Utc>>,
) -> Response {
    let etag = match etags.etag(payload) {
        Ok(etag) => etag,
        Err(e) => return ApiError::Internal(e.to_string()).into_response(),
    };
    let validators = Validators { etag, last_modified };
    let preconditions = Preconditions {
        if_none_match: header_str(headers, &IF_NONE_MATCH),
        if_modified_since: header_str(headers, &IF_MODIFIED_SINCE),
    };

    let mut response = match preconditions.evaluate(&validators) {
        Freshness::NotModified => StatusCode::NOT_MODIFIED.into_response(),
        Freshness::Modified => Json(payload).into_response(),
    };
    apply_validators(response.headers_mut(), &validators);
    response
}

fn apply_validators(headers: &mut HeaderMap, validators: &Validators) {
    if let Ok(value) = HeaderValue::from_str(&validators.etag_header()) {
        headers.insert(ETAG, value);
    }
    if let Some(value) = validators
        .last_modified_header()
        .and_then(|date| HeaderValue::from_str(&date).ok())
    {
        headers.insert(LAST_MODIFIED, value);
    }
}

fn header_str<'h>(headers: &'h HeaderMap, name: &axum::http::HeaderName) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload() -> serde_json::Value {
        json!({"parameters": [{"key": "radius_km", "value": "25"}], "matched": "service=traffic"})
    }

    #[test]
    fn test_full_response_carries_validators() {
        let stamp = Utc.with_ymd_and_hms(2016, 1, 2, 12, 34, 56).unwrap();
        let response = conditional_json(&EtagGenerator::default(), &HeaderMap::new(), &payload(), Some(stamp));

        assert_eq!(response.status(), StatusCode::OK);
        let etag = response.headers().get(ETAG).unwrap().to_str().unwrap();
        assert!(etag.starts_with('"') && etag.ends_with('"'));
        assert_eq!(
            response.headers().get(LAST_MODIFIED).unwrap(),
            "Sat, 02 Jan 2016 12:34:56 GMT"
        );
    }

    #[test]
    fn test_matching_etag_is_not_modified() {
        let etags = EtagGenerator::default();
        let first = conditional_json(&etags, &HeaderMap::new(), &payload(), None);
        let etag = first.headers().get(ETAG).unwrap().clone();

        let mut headers = HeaderMap::new();
        headers.insert(IF_NONE_MATCH, etag.clone());
        let second = conditional_json(&etags, &headers, &payload(), None);
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(second.headers().get(ETAG), Some(&etag));
        assert!(second.headers().get(LAST_MODIFIED).is_none());
    }

    #[test]
    fn test_error_status_codes() {
        let bad = ApiError::from(QueryError::DuplicateLevel("service".to_string()));
        assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NotFound("nothing".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_single_and_batch_payloads() {
        let single = serde_json::to_value(SearchPayload::One(SearchResultBody {
            parameters: vec![Parameter::new("k", "v")],
            matched: "/".to_string(),
        }))
        .unwrap();
        assert_eq!(single, json!({"parameters": [{"key": "k", "value": "v"}], "matched": "/"}));

        let batch = serde_json::to_value(SearchPayload::Many(vec![])).unwrap();
        assert_eq!(batch, json!([]));
    }
}
