//! Configuration module

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Debug mode (verbose logging)
    pub debug: bool,

    /// Detection report JSON (per-object results)
    pub detection_report_path: PathBuf,

    /// Summary statistics JSON
    pub summary_stats_path: PathBuf,

    /// Original grayscale images
    pub original_images_dir: PathBuf,

    /// Annotated result images
    pub results_images_dir: PathBuf,

    /// Extension of result images listed by the gallery (without dot)
    pub result_image_extension: String,

    /// Lower bound of the simulated analysis delay, in seconds
    pub analyze_delay_min_secs: f64,

    /// Upper bound of the simulated analysis delay, in seconds
    pub analyze_delay_max_secs: f64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let base_dir = env::var("APP_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let mut config = Self::with_base_dir(base_dir);

        config.port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(config.port);

        config.debug = debug_flag(env::var("DEBUG").ok(), env::var("FLASK_DEBUG").ok());

        if let Ok(path) = env::var("DETECTION_REPORT_PATH") {
            config.detection_report_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("SUMMARY_STATS_PATH") {
            config.summary_stats_path = PathBuf::from(path);
        }
        if let Ok(dir) = env::var("ORIGINAL_IMAGES_DIR") {
            config.original_images_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("RESULTS_IMAGES_DIR") {
            config.results_images_dir = PathBuf::from(dir);
        }
        if let Ok(ext) = env::var("RESULT_IMAGE_EXTENSION") {
            config.result_image_extension = ext.trim_start_matches('.').to_string();
        }

        config.analyze_delay_min_secs = env::var("ANALYZE_DELAY_MIN_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(config.analyze_delay_min_secs);

        config.analyze_delay_max_secs = env::var("ANALYZE_DELAY_MAX_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(config.analyze_delay_max_secs);

        config
    }

    /// Default layout rooted at `base_dir`:
    /// `data/` for the JSON artifacts and `static/images/{original,results}` for images.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let data_dir = base_dir.join("data");
        let images_dir = base_dir.join("static").join("images");

        Self {
            port: 5000,
            debug: false,
            detection_report_path: data_dir.join("detection_report.json"),
            summary_stats_path: data_dir.join("summary_statistics.json"),
            original_images_dir: images_dir.join("original"),
            results_images_dir: images_dir.join("results"),
            result_image_extension: "jpg".to_string(),
            analyze_delay_min_secs: 5.0,
            analyze_delay_max_secs: 8.0,
        }
    }

    /// Default tracing filter when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "panel_inspect=debug,tower_http=debug"
        } else {
            "panel_inspect=info,tower_http=info"
        }
    }
}

/// `DEBUG`, falling back to the legacy `FLASK_DEBUG`; only `true` (any case) enables it
fn debug_flag(debug: Option<String>, flask_debug: Option<String>) -> bool {
    debug
        .or(flask_debug)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
