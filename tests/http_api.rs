//! HTTP surface tests against the bundled example tree.

use axum::body::{to_bytes, Body};
use axum::http::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use axum::http::{Request, Response, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use config_service::lifecycle::ServiceState;
use std::sync::Arc;

mod common;

async fn get(uri: &str) -> Response<Body> {
    get_with(uri, &[]).await
}

async fn get_with(uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
    let mut request = Request::builder().uri(uri);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    common::router(common::example_state().await)
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn header<'r>(response: &'r Response<Body>, name: &axum::http::HeaderName) -> &'r str {
    response.headers().get(name).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn test_export_root() {
    let response = get("/tree").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, &LAST_MODIFIED), "Sat, 02 Jan 2016 12:34:56 GMT");
    assert!(header(&response, &ETAG).starts_with('"'));

    let body = json_body(response).await;
    assert_eq!(body["levels"], json!(["service", "model", "device"]));
    assert_eq!(body["nodes"][0]["match"], "traffic");
    // Included children are part of the export; include markers are not.
    assert_eq!(body["nodes"][0]["nodes"][0]["match"], "cheapo");
    assert!(body["nodes"][0].get("include").is_none());
    assert!(body["nodes"][0]["nodes"][0].get("include_array").is_none());
}

#[tokio::test]
async fn test_export_subtree() {
    let response = get("/tree/traffic/cheapo").await;
    assert_eq!(response.status(), StatusCode::OK);
    // Inherited from the root.
    assert_eq!(header(&response, &LAST_MODIFIED), "Sat, 02 Jan 2016 12:34:56 GMT");

    let body = json_body(response).await;
    assert_eq!(body["match"], "cheapo");
    assert_eq!(body["nodes"].as_array().unwrap().len(), 2);
    assert!(body.get("levels").is_none());
}

#[tokio::test]
async fn test_export_is_literal() {
    assert_eq!(get("/tree/traffic/nothing").await.status(), StatusCode::NOT_FOUND);
    // Lookup neither folds case nor evaluates regexes.
    assert_eq!(get("/tree/TRAFFIC").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get("/tree/traffic/luxuria").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_exact_and_regex() {
    let response = get("/tree?service=traffic&model=cheapo&device=device123").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, &LAST_MODIFIED), "Mon, 01 Feb 2016 00:00:00 GMT");
    assert_eq!(
        json_body(response).await,
        json!({
            "parameters": [{"key": "radius_km", "value": "80"}],
            "matched": "service=traffic&model=cheapo&device=device123"
        })
    );

    let body = json_body(get("/tree?service=traffic&model=cheapo&device=device999").await).await;
    assert_eq!(body["parameters"][0]["value"], "10");
    assert_eq!(body["matched"], "service=traffic&model=cheapo&device=device[0-9]*");
}

#[tokio::test]
async fn test_search_falls_back() {
    let body = json_body(get("/tree?service=traffic&model=unknown").await).await;
    assert_eq!(body["parameters"][0]["value"], "25");
    assert_eq!(body["matched"], "service=traffic");

    let body = json_body(get("/tree?service=unknown").await).await;
    assert_eq!(body["parameters"][0]["value"], "50");
    assert_eq!(body["matched"], "/");
}

#[tokio::test]
async fn test_search_levels_style() {
    let body = json_body(get("/tree?levels=model,service&search=luxuriant/traffic").await).await;
    assert_eq!(body["parameters"][0]["value"], "40");
    assert_eq!(body["matched"], "service=traffic&model=luxuri[ao].*");
}

#[tokio::test]
async fn test_search_batch() {
    let response = get("/tree?service=traffic&model=cheapo,luxuria").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 2);
    // "cheapo" has no parameters of its own.
    assert_eq!(results[0]["matched"], "service=traffic");
    assert_eq!(results[1]["parameters"][0]["value"], "40");

    let body = json_body(get("/tree?service=traffic,weather").await).await;
    assert_eq!(body[1]["parameters"][0]["value"], "100");
}

#[tokio::test]
async fn test_search_client_errors() {
    for uri in [
        "/tree?model=cheapo;luxuria",
        "/tree?colour=red",
        "/tree?levels=service,model&search=traffic",
        "/tree?levels=service",
        "/tree/traffic?model=cheapo",
    ] {
        let response = get(uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert!(json_body(response).await["error"].is_string());
    }
}

#[tokio::test]
async fn test_if_none_match() {
    let first = get("/tree?service=traffic").await;
    let etag = header(&first, &ETAG).to_string();

    let cached = get_with("/tree?service=traffic", &[("if-none-match", etag.as_str())]).await;
    assert_eq!(cached.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(header(&cached, &ETAG), etag);
    assert_eq!(header(&cached, &LAST_MODIFIED), header(&first, &LAST_MODIFIED));

    let compressed = format!("{}-gzip\"", etag.trim_end_matches('"'));
    let cached = get_with("/tree?service=traffic", &[(IF_NONE_MATCH.as_str(), compressed.as_str())]).await;
    assert_eq!(cached.status(), StatusCode::NOT_MODIFIED);

    let other = get_with("/tree?service=weather", &[("if-none-match", etag.as_str())]).await;
    assert_eq!(other.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_if_modified_since() {
    let cases = [
        ("Fri, 04 Mar 2016 08:00:00 GMT", StatusCode::NOT_MODIFIED),
        ("Sat, 05 Mar 2016 00:00:00 GMT", StatusCode::NOT_MODIFIED),
        ("Fri, 04 Mar 2016 07:59:59 GMT", StatusCode::OK),
        ("not a date", StatusCode::OK),
    ];
    for (date, expected) in cases {
        let response = get_with("/tree/weather", &[(IF_MODIFIED_SINCE.as_str(), date)]).await;
        assert_eq!(response.status(), expected, "{}", date);
    }
}

#[tokio::test]
async fn test_status_and_version() {
    let response = get("/status").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["ok"], true);

    let body = json_body(get("/version").await).await;
    assert_eq!(body["name"], "config-service");
    assert_eq!(body["uri"], "resource:///example.json");
}

#[tokio::test]
async fn test_request_id() {
    let response = get("/status").await;
    let generated = header(&response, &config_service::http::X_REQUEST_ID);
    assert_eq!(generated.len(), 36);

    let response = get_with("/status", &[("x-request-id", "client-chosen")]).await;
    assert_eq!(header(&response, &config_service::http::X_REQUEST_ID), "client-chosen");
}

#[tokio::test]
async fn test_degraded_service() {
    let service = Arc::new(ServiceState::degraded("resource:///broken.json", "Incorrect configuration: boom"));
    let router = common::router(service);

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "Incorrect configuration: boom");

    let response = router
        .oneshot(Request::builder().uri("/tree").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(LAST_MODIFIED).is_none());
    assert_eq!(json_body(response).await, json!({}));
}
