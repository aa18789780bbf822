#![allow(dead_code)]

pub mod config;
pub mod mock_ollama;
pub mod mock_openai;
pub mod server;

use std::net::SocketAddr;

use axum::Router;
use tokio_util::sync::CancellationToken;

/// Serve a router on an ephemeral loopback port until the token is cancelled
pub async fn spawn_router(app: Router) -> anyhow::Result<(SocketAddr, CancellationToken)> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_clone.cancelled().await;
            })
            .await
            .ok();
    });

    Ok((addr, shutdown))
}

/// Split an NDJSON body into parsed lines
pub fn ndjson_lines(body: &str) -> Vec<serde_json::Value> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("gateway emitted invalid JSON line"))
        .collect()
}
