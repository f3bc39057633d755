//! Panel Inspect
//!
//! Serves pre-computed solar panel defect detection results.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      PANEL INSPECT                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌─────────────┐  ┌───────────────────────┐ │
//! │  │  API      │  │  Latency    │  │  Static Images        │ │
//! │  │  Handlers │  │  Policy     │  │  (ServeDir)           │ │
//! │  │  (Axum)   │  │  (5-8s)     │  │  results / original   │ │
//! │  └─────┬─────┘  └─────────────┘  └───────────────────────┘ │
//! │        ▼                                                    │
//! │  ┌───────────┐      ┌──────────────────────────────────┐   │
//! │  │ Aggregator│ ───▶ │ Dataset (read-only, loaded once)  │   │
//! │  └───────────┘      │ detection_report.json             │   │
//! │                     │ summary_statistics.json           │   │
//! │                     └──────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dataset;
pub mod aggregator;
pub mod gallery;
pub mod latency;
pub mod models;
pub mod handlers;
pub mod error;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
    services::ServeDir,
};

pub use config::Config;
pub use dataset::Dataset;
pub use error::{AppError, AppResult, DataLoadError};
pub use latency::{LatencyPolicy, NoDelay, UniformDelay};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub config: Arc<Config>,
    pub latency: Arc<dyn LatencyPolicy>,
}

impl AppState {
    /// State with the uniform delay configured in `config`
    pub fn new(config: Config, dataset: Dataset) -> Self {
        let latency = UniformDelay::from_secs_f64(
            config.analyze_delay_min_secs,
            config.analyze_delay_max_secs,
        );

        Self {
            dataset: Arc::new(dataset),
            config: Arc::new(config),
            latency: Arc::new(latency),
        }
    }

    pub fn with_latency(mut self, latency: impl LatencyPolicy + 'static) -> Self {
        self.latency = Arc::new(latency);
        self
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    // API routes
    let api_routes = Router::new()
        .route("/api/images", get(handlers::images::list))
        .route("/api/summary", get(handlers::summary::get))
        .route("/api/analyze", post(handlers::analyze::analyze));

    // Static images
    let static_routes: Router<AppState> = Router::new()
        .nest_service("/results", ServeDir::new(&state.config.results_images_dir))
        .nest_service("/original", ServeDir::new(&state.config.original_images_dir));

    Router::new()
        .route("/", get(handlers::index::page))
        .route("/health", get(handlers::health::check))
        .merge(api_routes)
        .merge(static_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    /// Zero delay that counts how often it was asked
    #[derive(Clone, Default)]
    struct CountingDelay(Arc<AtomicUsize>);

    impl LatencyPolicy for CountingDelay {
        fn sample(&self) -> Duration {
            self.0.fetch_add(1, Ordering::SeqCst);
            Duration::ZERO
        }
    }

    fn detection(image: &str, area: f64, confidence: f64) -> Value {
        json!({
            "source_image": {
                "image_name": image,
                "image_dimensions": { "width": 100, "height": 100 }
            },
            "detection_details": {
                "confidence": confidence,
                "bounding_box": { "dimensions": { "area": area } }
            }
        })
    }

    fn write_json(path: &Path, value: &Value) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, value.to_string()).unwrap();
    }

    /// Base dir with the default layout: 12 detections on panel_01, none on panel_02
    fn fixture() -> (TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_base_dir(dir.path());

        let mut objects: Vec<Value> = (0..12)
            .map(|i| detection("panel_01.jpg", 100.0, 0.5 + i as f64 * 0.03))
            .collect();
        objects.push(detection("panel_03.jpg", 10.0, 0.4));

        write_json(
            &config.detection_report_path,
            &json!({
                "metadata": { "total_detected_objects": objects.len() },
                "detected_objects": objects,
            }),
        );
        write_json(
            &config.summary_stats_path,
            &json!({ "total_images": 50, "total_detected_objects": 120 }),
        );

        fs::create_dir_all(&config.results_images_dir).unwrap();
        fs::create_dir_all(&config.original_images_dir).unwrap();
        for name in ["panel_02.jpg", "panel_01.jpg"] {
            fs::write(config.results_images_dir.join(name), b"result-bytes").unwrap();
            fs::write(config.original_images_dir.join(name), b"original-bytes").unwrap();
        }
        fs::write(config.results_images_dir.join("readme.txt"), b"ignored").unwrap();

        (dir, config)
    }

    fn app(config: Config, latency: impl LatencyPolicy + 'static) -> Router {
        let dataset =
            Dataset::load(&config.detection_report_path, &config.summary_stats_path).unwrap();
        create_router(AppState::new(config, dataset).with_latency(latency))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, bytes) = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_analyze(app: Router, body: &str) -> (StatusCode, Value) {
        let request = Request::post("/api/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, bytes) = send(app, request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_images_sorted_and_stable() {
        let (_dir, config) = fixture();
        let app = app(config, NoDelay);

        let (status, first) = get_json(app.clone(), "/api/images").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first, json!({ "images": ["panel_01.jpg", "panel_02.jpg"] }));

        let (_, second) = get_json(app, "/api/images").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_summary_passthrough() {
        let (_dir, config) = fixture();
        let (status, body) = get_json(app(config, NoDelay), "/api/summary").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "total_images": 50, "total_detected_objects": 120 }));
    }

    #[tokio::test]
    async fn test_empty_state_still_serves() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_base_dir(dir.path());
        let app = app(config, NoDelay);

        let (_, summary) = get_json(app.clone(), "/api/summary").await;
        assert_eq!(summary, json!({}));

        let (_, images) = get_json(app.clone(), "/api/images").await;
        assert_eq!(images, json!({ "images": [] }));

        let (status, _) = send(app, Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_analyze_requires_image_name() {
        let (_dir, config) = fixture();
        let delay = CountingDelay::default();
        let app = app(config, delay.clone());

        for body in ["{}", r#"{"image_name": ""}"#, r#"{"image_name": null}"#, "not json"] {
            let (status, json) = post_analyze(app.clone(), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
            assert_eq!(json, json!({ "error": "No image specified" }));
        }
        assert_eq!(delay.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analyze_missing_result_skips_delay() {
        let (_dir, config) = fixture();
        let delay = CountingDelay::default();
        let app = app(config, delay.clone());

        // panel_03 has detections but no result image on disk
        for name in ["panel_03.jpg", "../data/detection_report.json"] {
            let body = json!({ "image_name": name }).to_string();
            let (status, json) = post_analyze(app.clone(), &body).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(json, json!({ "error": "Result not found for this image" }));
        }
        assert_eq!(delay.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analyze_damaged_image() {
        let (_dir, config) = fixture();
        let delay = CountingDelay::default();
        let app = app(config, delay.clone());

        let (status, body) = post_analyze(app, r#"{"image_name": "panel_01.jpg"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(delay.0.load(Ordering::SeqCst), 1);

        assert_eq!(body["success"], true);
        assert_eq!(body["image_name"], "panel_01.jpg");
        assert_eq!(body["result_url"], "/results/panel_01.jpg");
        assert_eq!(body["original_url"], "/original/panel_01.jpg");
        assert_eq!(body["processing_time"], 0.0);
        assert_eq!(body["has_defects"], true);
        assert_eq!(body["defect_count"], 12);
        assert_eq!(body["confidence"], 0.83);
        // 12 * 100 px over 100x100
        assert_eq!(body["total_defect_area"], 1200.0);
        assert_eq!(body["coverage_percentage"], 12.0);
        assert_eq!(body["status"], "CRITICAL");
        assert_eq!(body["image_dimensions"], json!({ "width": 100, "height": 100 }));
        assert_eq!(body["detected_objects"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_analyze_clean_image() {
        let (_dir, config) = fixture();
        let (status, body) = post_analyze(app(config, NoDelay), r#"{"image_name": "panel_02.jpg"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["has_defects"], false);
        assert_eq!(body["defect_count"], 0);
        assert_eq!(body["status"], "GOOD CONDITION");
        assert_eq!(body["coverage_percentage"], 0.0);
        assert_eq!(body["image_dimensions"], json!({}));
        assert_eq!(body["detected_objects"], json!([]));
    }

    #[tokio::test]
    async fn test_analyze_without_report() {
        let (_dir, config) = fixture();
        fs::remove_file(&config.detection_report_path).unwrap();

        let (status, body) = post_analyze(app(config, NoDelay), r#"{"image_name": "panel_01.jpg"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["has_defects"], false);
        assert_eq!(body["status"], "GOOD CONDITION");
        assert!(body.get("image_dimensions").is_none());
        assert!(body.get("detected_objects").is_none());
    }

    #[tokio::test]
    async fn test_analyze_with_empty_report_document() {
        let (_dir, config) = fixture();
        fs::write(&config.detection_report_path, "{}").unwrap();

        let (status, body) = post_analyze(app(config, NoDelay), r#"{"image_name": "panel_01.jpg"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["defect_count"], 0);
        assert_eq!(body["status"], "GOOD CONDITION");
        assert!(body.get("image_dimensions").is_none());
        assert!(body.get("detected_objects").is_none());
    }

    #[tokio::test]
    async fn test_static_images() {
        let (_dir, config) = fixture();
        let app = app(config, NoDelay);

        let (status, bytes) = send(
            app.clone(),
            Request::get("/results/panel_01.jpg").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"result-bytes");

        let (status, bytes) = send(
            app.clone(),
            Request::get("/original/panel_02.jpg").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"original-bytes");

        let (status, _) = send(
            app,
            Request::get("/original/missing.jpg").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, config) = fixture();
        let (status, body) = get_json(app(config, NoDelay), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["report_loaded"], true);
        assert_eq!(body["summary_loaded"], true);
    }
}
