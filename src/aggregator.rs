//! Detection Aggregator
//!
//! Collapses the per-object detection report into a per-image damage verdict.
//! Pure over the loaded report: no I/O, no shared mutable state.

use crate::models::{AnalysisResult, DamageStatus, DetectionReport};

/// Aggregate every record whose `source_image.image_name` equals `image_name`.
///
/// Image dimensions come from the first matched record and are not
/// cross-checked against the others. Records for one image are expected to
/// agree; if they do not, the first one wins. A matched record without an
/// area adds nothing to the total, one without a confidence is left out of
/// the maximum.
pub fn analyze<'a>(report: &'a DetectionReport, image_name: &str) -> AnalysisResult<'a> {
    let detected_objects: Vec<_> = report
        .detected_objects
        .iter()
        .filter(|obj| obj.image_name() == Some(image_name))
        .collect();

    let Some(first) = detected_objects.first() else {
        return AnalysisResult::empty();
    };

    let total_defect_area: f64 = detected_objects
        .iter()
        .filter_map(|obj| obj.area())
        .sum();

    let coverage_percentage = match first.image_area() {
        Some(image_area) => total_defect_area / image_area * 100.0,
        None => {
            tracing::warn!(
                "Image {} has no usable dimensions, reporting 0% coverage",
                image_name
            );
            0.0
        }
    };

    let max_confidence = detected_objects
        .iter()
        .filter_map(|obj| obj.confidence())
        .reduce(f64::max)
        .unwrap_or(0.0);

    AnalysisResult {
        detections_count: detected_objects.len(),
        damage_status: DamageStatus::from_coverage(coverage_percentage),
        coverage_percentage,
        total_defect_area,
        max_confidence,
        image_dimensions: first.image_dimensions(),
        detected_objects,
    }
}
