//! Request handlers.
//!
//! # Endpoints
//! - `GET /tree`, `GET /tree/{*path}`: export a node, or resolve a search
//!   (root only)
//! - `GET /status`: 200 when the tree loaded, 503 when running degraded
//! - `GET /version`: build and load information

use std::time::Instant;

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::caching::last_modified;
use crate::http::params::{parse_tree_query, TreeQuery};
use crate::http::response::{conditional_json, ApiError, SearchPayload};
use crate::http::server::AppState;
use crate::matching::{expand_terms, MatchResult, Matcher, QueryError};
use crate::observability::metrics;
use crate::tree::NodeDocument;

pub async fn tree_root(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let response = match parse_tree_query(query.as_deref()) {
        Ok(TreeQuery::Lookup) => lookup(&state, "", &headers),
        Ok(TreeQuery::Search(levels)) => search(&state, &levels, &headers),
        Err(e) => client_error(e),
    };
    metrics::record_request("tree", response.status().as_u16(), start);
    response
}

pub async fn tree_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let response = match parse_tree_query(query.as_deref()) {
        Ok(TreeQuery::Lookup) => lookup(&state, &path, &headers),
        Ok(TreeQuery::Search(_)) => client_error(QueryError::SearchOnPath(path)),
        Err(e) => client_error(e),
    };
    metrics::record_request("tree", response.status().as_u16(), start);
    response
}

pub async fn status(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let response = match state.service.error() {
        None => (
            StatusCode::OK,
            Json(json!({ "ok": true, "uri": state.service.uri() })),
        )
            .into_response(),
        Some(error) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "ok": false, "uri": state.service.uri(), "error": error })),
        )
            .into_response(),
    };
    metrics::record_request("status", response.status().as_u16(), start);
    response
}

pub async fn version(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let response = Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "uri": state.service.uri(),
        "started_at": state.service.started_at().to_rfc3339(),
    }))
    .into_response();
    metrics::record_request("version", response.status().as_u16(), start);
    response
}

fn lookup(state: &AppState, path: &str, headers: &HeaderMap) -> Response {
    let Some(node) = state.service.tree().find_node(path) else {
        return ApiError::NotFound(format!("No configuration node at '{}'", path)).into_response();
    };
    let document = NodeDocument::from_node(node);
    conditional_json(&state.etags, headers, &document, last_modified(node))
}

fn search(state: &AppState, levels: &[(String, Vec<String>)], headers: &HeaderMap) -> Response {
    let queries = expand_terms(levels);
    let results = match Matcher::new(state.service.tree()).resolve(&queries) {
        Ok(results) => results,
        Err(e) => return client_error(e),
    };
    if results.is_empty() {
        tracing::debug!(queries = queries.len(), "No configuration matches");
        return ApiError::NotFound("No configuration matches the query".to_string()).into_response();
    }

    let modified = results.iter().filter_map(MatchResult::last_modified).max();
    conditional_json(&state.etags, headers, &SearchPayload::from_results(&results), modified)
}

fn client_error(error: QueryError) -> Response {
    tracing::debug!(error = %error, "Rejected query");
    ApiError::BadRequest(error).into_response()
}
