//! Image listing handler

use axum::{extract::State, Json};

use crate::{gallery, AppResult, AppState};
use crate::models::ImagesResponse;

/// List result images available for analysis
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ImagesResponse>> {
    let images = gallery::list_images(
        &state.config.results_images_dir,
        &state.config.result_image_extension,
    )
    .await?;

    Ok(Json(ImagesResponse { images }))
}
