//! HTTP routes for the report server.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
};
use salesdash_core::{PageController, Report, html_document};
use tokio::sync::Mutex as TokioMutex;

/// Application state shared across handlers.
pub struct AppState {
    /// Page controller and its dataset cache. Renders are serialized on
    /// this lock.
    pub controller: TokioMutex<PageController>,
}

impl AppState {
    pub fn new(controller: PageController) -> Self {
        Self {
            controller: TokioMutex::new(controller),
        }
    }
}

/// Create the router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/report", get(report_handler))
        .route("/api/cache/reset", post(cache_reset_handler))
        .with_state(state)
}

/// Render the report and keep whatever was emitted before a failure.
///
/// Loading and plotting are synchronous, so the render runs on the blocking
/// pool while the async workers keep serving other requests.
async fn render(state: Arc<AppState>) -> (Report, Option<String>) {
    let rendered = tokio::task::spawn_blocking(move || {
        let mut controller = state.controller.blocking_lock();
        let mut report = Report::new();
        let result = controller.render(&mut report);
        (report, result)
    })
    .await;

    match rendered {
        Ok((report, Ok(()))) => (report, None),
        Ok((report, Err(e))) => {
            tracing::error!("Report render failed: {}", e);
            (report, Some(e.with_hint()))
        }
        Err(e) => {
            tracing::error!("Render task join error: {}", e);
            (Report::new(), Some(format!("render task failed: {e}")))
        }
    }
}

/// Rendered report page.
async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (mut report, error) = render(state).await;
    match error {
        None => (StatusCode::OK, Html(html_document(&report))),
        Some(message) => {
            report.error(message);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(html_document(&report)))
        }
    }
}

/// Report blocks as JSON.
async fn report_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (report, error) = render(state).await;
    let blocks = serde_json::to_value(&report).unwrap_or_default();
    match error {
        None => (StatusCode::OK, Json(blocks)),
        Some(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": message,
                "partial": blocks,
            })),
        ),
    }
}

/// Drop the cached dataset so the next render reads the file again.
async fn cache_reset_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    state.controller.lock().await.cache_mut().clear();
    tracing::info!("Dataset cache cleared");
    Json(serde_json::json!({
        "status": "ok",
        "cleared": true
    }))
}

/// Health check handler.
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use salesdash_core::{ReportConfig, ReportContent};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app_for(data_path: &Path) -> (Router, Arc<AppState>) {
        let controller = PageController::new(
            ReportConfig::default().with_data_path(data_path),
            ReportContent::builtin().unwrap(),
        );
        let state = Arc::new(AppState::new(controller));
        (create_router(state.clone()), state)
    }

    fn write_dataset(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("main_data.csv");
        fs::write(
            &path,
            "order_status,product category\ndelivered,toys\nshipped,auto\ncanceled,toys\n",
        )
        .expect("Failed to write dataset");
        path
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let temp = TempDir::new().unwrap();
        let (app, _) = app_for(&temp.path().join("main_data.csv"));

        let (status, body) = get(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_renders_and_caches() {
        let temp = TempDir::new().unwrap();
        let path = write_dataset(&temp);
        let (app, state) = app_for(&path);

        let (status, body) = get(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("id=\"top-product-categories-by-sales\""));

        let (status, _) = get(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state.controller.lock().await.cache().reads(), 1);
    }

    #[tokio::test]
    async fn test_index_missing_dataset_shows_error() {
        let temp = TempDir::new().unwrap();
        let (app, _) = app_for(&temp.path().join("absent.csv"));

        let (status, body) = get(app, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("class=\"error\""));
        assert!(body.contains("dataset not found"));
        assert!(body.contains("Table of Contents"));
    }

    #[tokio::test]
    async fn test_health_responds_while_render_waits() {
        let temp = TempDir::new().unwrap();
        let path = write_dataset(&temp);
        let (app, state) = app_for(&path);

        let guard = state.controller.lock().await;
        let pending = tokio::spawn(get(app.clone(), "/"));
        tokio::task::yield_now().await;

        let (status, _) = get(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!pending.is_finished());

        drop(guard);
        let (status, body) = pending.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.matches("<svg").count(), 3);
    }

    #[tokio::test]
    async fn test_report_json_error_keeps_partial() {
        let temp = TempDir::new().unwrap();
        let (app, _) = app_for(&temp.path().join("absent.csv"));

        let (status, body) = get(app, "/api/report").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("dataset not found"));
        assert_eq!(json["partial"]["blocks"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_report_json() {
        let temp = TempDir::new().unwrap();
        let path = write_dataset(&temp);
        let (app, _) = app_for(&path);

        let (status, body) = get(app, "/api/report").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let charts: Vec<&serde_json::Value> = json["blocks"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|b| b["type"] == "chart")
            .collect();
        assert_eq!(charts.len(), 3);
        assert_eq!(charts[2]["labels"], serde_json::json!(["toys"]));
    }

    #[tokio::test]
    async fn test_cache_reset() {
        let temp = TempDir::new().unwrap();
        let path = write_dataset(&temp);
        let (app, state) = app_for(&path);

        get(app.clone(), "/").await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/cache/reset")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!state.controller.lock().await.cache().contains(&path));

        get(app, "/").await;
        assert_eq!(state.controller.lock().await.cache().reads(), 2);
    }
}
