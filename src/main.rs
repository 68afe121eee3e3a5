use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

mod config;
mod extract;
mod models;
mod pipeline;
mod render;
mod rewrite;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env();
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; /api/scrape-news will return 500");
    }

    let listen_addr = config.listen_addr.clone();
    let state = Arc::new(AppState::new(config).unwrap());

    let listener = tokio::net::TcpListener::bind(&listen_addr).await.unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app(state)).await.unwrap();
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/scrape-news", get(scrape_news))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Hindu News Scraper API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/api/scrape-news": "GET - Scrape and reframe latest news",
            "/api/health": "GET - Health check"
        }
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "message": "Hindu News Scraper API is running"
    }))
}

async fn scrape_news(State(state): State<Arc<AppState>>) -> Response {
    match pipeline::run(&state).await {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "error": e.to_string()})),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_without_key() -> Router {
        let config = Config {
            gemini_api_key: None,
            listen_addr: "127.0.0.1:0".to_string(),
        };
        app(Arc::new(AppState::new(config).unwrap()))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let (status, body) = get_json(app_without_key(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn root_lists_endpoints() {
        let (status, body) = get_json(app_without_key(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Hindu News Scraper API");
        assert!(body["endpoints"]["/api/scrape-news"].is_string());
    }

    #[tokio::test]
    async fn scrape_news_without_credential_returns_500() {
        let (status, body) = get_json(app_without_key(), "/api/scrape-news").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], Value::Bool(false));
        assert_eq!(body["error"], "Gemini API key not configured");
    }
}
