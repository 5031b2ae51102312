//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use config_service::caching::EtagGenerator;
use config_service::http::{build_router, AppState};
use config_service::lifecycle::{ServiceState, Shutdown};
use config_service::loader::{Resources, TreeLoader};
use config_service::{HttpServer, ServiceConfig};

/// Serve fixed documents by path, e.g. `/root.json`. Unknown paths get 404.
/// Returns the address the server listens on.
pub async fn start_document_server(documents: Vec<(&'static str, u16, String)>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let documents: Arc<HashMap<&'static str, (u16, String)>> = Arc::new(
        documents
            .into_iter()
            .map(|(path, status, body)| (path, (status, body)))
            .collect(),
    );

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let documents = documents.clone();
                    tokio::spawn(async move {
                        let (read, mut write) = socket.into_split();
                        let mut lines = BufReader::new(read).lines();
                        let request_line = lines.next_line().await.ok().flatten().unwrap_or_default();
                        // Drain headers up to the blank line.
                        while let Ok(Some(line)) = lines.next_line().await {
                            if line.is_empty() {
                                break;
                            }
                        }

                        let path = request_line.split_whitespace().nth(1).unwrap_or("/");
                        let (status, body) = documents
                            .get(path)
                            .cloned()
                            .unwrap_or((404, "not found".to_string()));
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = write.write_all(response.as_bytes()).await;
                        let _ = write.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Service state holding the bundled example tree.
pub async fn example_state() -> Arc<ServiceState> {
    let tree = TreeLoader::with_source(Resources::bundled())
        .load("resource:///example.json")
        .await
        .unwrap();
    Arc::new(ServiceState::loaded(tree, "resource:///example.json"))
}

/// Router over `service`, with a default salt and generous timeout.
pub fn router(service: Arc<ServiceState>) -> axum::Router {
    build_router(
        AppState::new(service, EtagGenerator::default()),
        Duration::from_secs(30),
    )
}

/// Run the full HTTP server on an ephemeral port.
pub async fn start_service(service: Arc<ServiceState>) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let server = HttpServer::new(&ServiceConfig::default(), service);
    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that never goes through a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}
