//! End-to-end tests against a running server.

use std::sync::Arc;

use config_service::lifecycle::ServiceState;

mod common;

#[tokio::test]
async fn test_serves_and_shuts_down() {
    let (addr, shutdown) = common::start_service(common::example_state().await).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/tree", addr))
        .query(&[("service", "weather")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["parameters"][0]["value"], "100");

    shutdown.trigger();
}

#[tokio::test]
async fn test_degraded_status_over_tcp() {
    let service = Arc::new(ServiceState::degraded("http://nowhere.invalid/", "Incorrect configuration: down"));
    let (addr, shutdown) = common::start_service(service).await;

    let res = common::client()
        .get(format!("http://{}/status", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 503);

    shutdown.trigger();
}

#[tokio::test]
async fn test_concurrent_searches_agree() {
    let (addr, shutdown) = common::start_service(common::example_state().await).await;
    let client = common::client();
    let url = format!(
        "http://{}/tree?service=traffic&model=cheapo&device=device123",
        addr
    );

    let concurrency = 16;
    let requests_per_task = 20;
    let mut tasks = Vec::new();
    for _ in 0..concurrency {
        let client = client.clone();
        let url = url.clone();
        tasks.push(tokio::spawn(async move {
            let mut etags = Vec::new();
            for _ in 0..requests_per_task {
                let res = client.get(&url).send().await.unwrap();
                assert_eq!(res.status(), 200);
                etags.push(res.headers()["etag"].to_str().unwrap().to_string());
            }
            etags
        }));
    }

    let mut all = Vec::new();
    for task in tasks {
        all.extend(task.await.unwrap());
    }
    assert_eq!(all.len(), concurrency * requests_per_task);
    assert!(all.windows(2).all(|pair| pair[0] == pair[1]));

    shutdown.trigger();
}
