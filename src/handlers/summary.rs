//! Summary statistics handler

use axum::{extract::State, Json};
use serde_json::Value;

use crate::AppState;

/// Summary statistics exactly as loaded
pub async fn get(State(state): State<AppState>) -> Json<Value> {
    Json(state.dataset.summary.clone())
}
