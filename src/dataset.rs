//! Dataset module - detection report and summary statistics loaded at startup

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::aggregator;
use crate::error::DataLoadError;
use crate::models::{AnalysisResult, DetectionReport};

/// Read-only data shared by every request
#[derive(Debug, Clone)]
pub struct Dataset {
    /// `None` when the report file was absent
    pub report: Option<DetectionReport>,

    /// Passed through verbatim; `{}` when the file was absent
    pub summary: Value,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            report: None,
            summary: Value::Object(Map::new()),
        }
    }
}

impl Dataset {
    /// Load both artifacts. Missing files yield empty data, malformed JSON is an error.
    ///
    /// A report file holding an empty document (`{}`, `[]`, `null`) counts as
    /// no report at all.
    pub fn load(report_path: &Path, summary_path: &Path) -> Result<Self, DataLoadError> {
        let mut dataset = Self::default();

        match read_json::<Value>(report_path)? {
            Some(raw) if is_empty_document(&raw) => {
                tracing::warn!("Detection report at {} is empty", report_path.display());
            }
            Some(raw) => {
                let report: DetectionReport =
                    serde_json::from_value(raw).map_err(|source| DataLoadError::Json {
                        path: report_path.display().to_string(),
                        source,
                    })?;
                let total = report.total_detected_objects();
                tracing::info!("Loaded detection data: {} objects", total);
                dataset.report = Some(report);
            }
            None => {
                tracing::warn!("Detection report not found at {}", report_path.display());
            }
        }

        if let Some(summary) = read_json::<Value>(summary_path)? {
            let zero = serde_json::Value::from(0);
            let images = summary.get("total_images").unwrap_or(&zero);
            let defects = summary.get("total_detected_objects").unwrap_or(&zero);
            tracing::info!("Loaded summary: {} images, {} defects", images, defects);
            dataset.summary = summary;
        } else {
            tracing::warn!("Summary statistics not found at {}", summary_path.display());
        }

        Ok(dataset)
    }

    pub fn has_report(&self) -> bool {
        self.report.is_some()
    }

    pub fn has_summary(&self) -> bool {
        self.summary.as_object().map_or(true, |m| !m.is_empty())
    }

    /// Aggregate the report for one image; `None` when no report was loaded
    pub fn compute_analysis(&self, image_name: &str) -> Option<AnalysisResult<'_>> {
        self.report
            .as_ref()
            .map(|report| aggregator::analyze(report, image_name))
    }
}

/// Documents that carry no data: `null`, `false`, `0`, `""`, `[]`, `{}`
fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(m) => m.is_empty(),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, DataLoadError> {
    if !path.exists() {
        return Ok(None);
    }

    let data = fs::read(path).map_err(|source| DataLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let value = serde_json::from_slice(&data).map_err(|source| DataLoadError::Json {
        path: path.display().to_string(),
        source,
    })?;

    Ok(Some(value))
}
