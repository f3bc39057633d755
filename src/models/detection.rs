//! Detection report model
//!
//! Mirrors `detection_report.json`. Records are kept as raw JSON so they echo
//! back unchanged; accessors read the few fields the aggregator needs and
//! return `None` when a field is absent or has the wrong type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root of the detection report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionReport {
    #[serde(default)]
    pub metadata: Value,

    #[serde(default)]
    pub detected_objects: Vec<DetectionRecord>,
}

impl DetectionReport {
    /// `metadata.total_detected_objects` as written in the file, or `0`
    pub fn total_detected_objects(&self) -> Value {
        self.metadata
            .get("total_detected_objects")
            .cloned()
            .unwrap_or_else(|| Value::from(0))
    }
}

/// One bounding-box defect observation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionRecord(pub Value);

impl DetectionRecord {
    /// `source_image.image_name`; records without one never match an image
    pub fn image_name(&self) -> Option<&str> {
        self.0.pointer("/source_image/image_name")?.as_str()
    }

    /// `source_image.image_dimensions`, verbatim
    pub fn image_dimensions(&self) -> Option<&Value> {
        self.0.pointer("/source_image/image_dimensions")
    }

    /// Pixel area of the source image, `None` when a side is missing, zero or not finite
    pub fn image_area(&self) -> Option<f64> {
        let dims = self.image_dimensions()?;
        let area = dims.get("width")?.as_f64()? * dims.get("height")?.as_f64()?;
        (area.is_finite() && area > 0.0).then_some(area)
    }

    /// `detection_details.bounding_box.dimensions.area`
    pub fn area(&self) -> Option<f64> {
        self.0.pointer("/detection_details/bounding_box/dimensions/area")?.as_f64()
    }

    /// `detection_details.confidence` (0.0 - 1.0)
    pub fn confidence(&self) -> Option<f64> {
        self.0.pointer("/detection_details/confidence")?.as_f64()
    }
}
