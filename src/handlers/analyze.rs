//! Analyze handler
//!
//! Waits out the simulated processing delay, then answers from the
//! pre-computed detection report.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::{gallery, AppError, AppResult, AppState};
use crate::models::{AnalysisResult, AnalyzeRequest, AnalyzeResponse, DamageStatus};

/// Upper bound on records echoed back in one response
pub const MAX_RETURNED_OBJECTS: usize = 10;

/// Analyze one result image
///
/// If the client disconnects during the delay the future is dropped and the
/// aggregation never runs.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> AppResult<Response> {
    let image_name = match payload {
        Ok(Json(req)) => req.image_name.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!("Rejected analyze body: {}", rejection.body_text());
            String::new()
        }
    };

    if image_name.is_empty() {
        return Err(AppError::ValidationError("No image specified".to_string()));
    }

    if gallery::find_image(&state.config.results_images_dir, &image_name).await.is_none() {
        return Err(AppError::NotFound("Result not found for this image".to_string()));
    }

    let delay = state.latency.sample();
    tracing::debug!("Simulating {:.2}s of processing for {}", delay.as_secs_f64(), image_name);
    tokio::time::sleep(delay).await;

    let analysis = state.dataset.compute_analysis(&image_name);

    if let Some(result) = &analysis {
        tracing::info!(
            "Analyzed {}: {} defects, {:.2}% coverage, {}",
            image_name,
            result.detections_count,
            result.coverage_percentage,
            result.damage_status
        );
    }

    let response = build_response(image_name, delay.as_secs_f64(), analysis.as_ref());
    Ok(Json(response).into_response())
}

fn build_response<'a>(
    image_name: String,
    processing_secs: f64,
    analysis: Option<&'a AnalysisResult<'a>>,
) -> AnalyzeResponse<'a> {
    let mut response = AnalyzeResponse {
        success: true,
        result_url: format!("/results/{}", image_name),
        original_url: format!("/original/{}", image_name),
        image_name,
        processing_time: round_to(processing_secs, 2),
        has_defects: false,
        defect_count: 0,
        confidence: 0.0,
        status: DamageStatus::GoodCondition,
        coverage_percentage: 0.0,
        total_defect_area: 0.0,
        image_dimensions: None,
        detected_objects: None,
    };

    // No report loaded: bare "good condition" answer without dimensions or objects
    let Some(analysis) = analysis else {
        return response;
    };

    let shown = analysis.detected_objects.len().min(MAX_RETURNED_OBJECTS);

    response.has_defects = analysis.has_defects();
    response.defect_count = analysis.detections_count;
    response.confidence = round_to(analysis.max_confidence, 4);
    response.status = analysis.damage_status;
    response.coverage_percentage = round_to(analysis.coverage_percentage, 2);
    response.total_defect_area = round_to(analysis.total_defect_area, 2);
    response.image_dimensions = Some(
        analysis
            .image_dimensions
            .cloned()
            .unwrap_or_else(|| serde_json::json!({})),
    );
    response.detected_objects = Some(&analysis.detected_objects[..shown]);

    response
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
