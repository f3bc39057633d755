//! Analysis model
//!
//! Damage classification plus the request/response types of the analyze API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::detection::DetectionRecord;

// ============================================================================
// DAMAGE STATUS
// ============================================================================

/// Panel condition, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum DamageStatus {
    #[serde(rename = "GOOD CONDITION")]
    GoodCondition,
    #[serde(rename = "NEEDS REPAIR")]
    NeedsRepair,
    #[serde(rename = "CRITICAL")]
    Critical,
    #[serde(rename = "FULLY DAMAGED")]
    FullyDamaged,
}

impl DamageStatus {
    /// Coverage (percent) at or above which each status applies
    pub const FULLY_DAMAGED_THRESHOLD: f64 = 15.0;
    pub const CRITICAL_THRESHOLD: f64 = 8.0;
    pub const NEEDS_REPAIR_THRESHOLD: f64 = 2.0;

    /// Classify a coverage percentage. Boundaries belong to the more severe bucket.
    pub fn from_coverage(coverage_percentage: f64) -> Self {
        if coverage_percentage >= Self::FULLY_DAMAGED_THRESHOLD {
            DamageStatus::FullyDamaged
        } else if coverage_percentage >= Self::CRITICAL_THRESHOLD {
            DamageStatus::Critical
        } else if coverage_percentage >= Self::NEEDS_REPAIR_THRESHOLD {
            DamageStatus::NeedsRepair
        } else {
            DamageStatus::GoodCondition
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DamageStatus::GoodCondition => "GOOD CONDITION",
            DamageStatus::NeedsRepair => "NEEDS REPAIR",
            DamageStatus::Critical => "CRITICAL",
            DamageStatus::FullyDamaged => "FULLY DAMAGED",
        }
    }
}

impl std::fmt::Display for DamageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ANALYSIS RESULT
// ============================================================================

/// Per-image aggregation over the detection report. Borrowed from the dataset.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult<'a> {
    pub detections_count: usize,
    pub detected_objects: Vec<&'a DetectionRecord>,
    pub damage_status: DamageStatus,
    pub coverage_percentage: f64,
    pub total_defect_area: f64,
    pub max_confidence: f64,
    /// Taken from the first matched record only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_dimensions: Option<&'a Value>,
}

impl AnalysisResult<'_> {
    /// Result for an image without any detections
    pub fn empty() -> Self {
        Self {
            detections_count: 0,
            detected_objects: Vec::new(),
            damage_status: DamageStatus::GoodCondition,
            coverage_percentage: 0.0,
            total_defect_area: 0.0,
            max_confidence: 0.0,
            image_dimensions: None,
        }
    }

    pub fn has_defects(&self) -> bool {
        self.detections_count > 0
    }
}

// ============================================================================
// API TYPES
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub image_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse<'a> {
    pub success: bool,
    pub image_name: String,
    pub result_url: String,
    pub original_url: String,
    pub processing_time: f64,
    pub has_defects: bool,
    pub defect_count: usize,
    pub confidence: f64,
    pub status: DamageStatus,
    pub coverage_percentage: f64,
    pub total_defect_area: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_dimensions: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_objects: Option<&'a [&'a DetectionRecord]>,
}

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub images: Vec<String>,
}
