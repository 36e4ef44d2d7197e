//! Liveness endpoint for the hosting platform

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::SocketAddr;
use tracing::info;

pub const ALIVE_TEXT: &str = "✅ Bot ativo e rodando.";

/// Web server configuration
#[derive(Debug, Clone, Copy)]
pub struct WebServerConfig {
    pub port: u16,
}

/// Shared state for web handlers
#[derive(Clone)]
pub struct AppState {
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub started_at: String,
    pub uptime_seconds: i64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(alive))
        .route("/health", get(health))
        .with_state(state)
}

/// Start the health server; runs until the listener fails
pub async fn start_web_server(config: WebServerConfig, state: AppState) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Health server listening on http://{}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn alive() -> &'static str {
    ALIVE_TEXT
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health_report(&state, Utc::now()))
}

fn health_report(state: &AppState, now: DateTime<Utc>) -> HealthResponse {
    HealthResponse {
        status: "ok",
        started_at: state.started_at.to_rfc3339(),
        uptime_seconds: (now - state.started_at).num_seconds().max(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_alive_text() {
        assert_eq!(alive().await, "✅ Bot ativo e rodando.");
    }

    #[test]
    fn test_health_report_uptime() {
        let started_at = Utc::now();
        let state = AppState { started_at };

        let report = health_report(&state, started_at + Duration::seconds(90));
        assert_eq!(report.status, "ok");
        assert_eq!(report.uptime_seconds, 90);
        assert_eq!(report.started_at, started_at.to_rfc3339());
    }

    #[tokio::test]
    async fn test_served_over_http() {
        let state = AppState {
            started_at: Utc::now(),
        };
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });

        let body = reqwest::get(format!("http://{}/", addr))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, ALIVE_TEXT);

        let health: serde_json::Value = reqwest::get(format!("http://{}/health", addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "ok");
    }
}
