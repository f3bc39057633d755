//! Panel Inspect server entry point

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use panel_inspect::{create_router, gallery, AppState, Config, Dataset};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| config.default_log_filter().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Solar Panel Defect Detection App");
    tracing::info!("Detection report: {}", config.detection_report_path.display());
    tracing::info!("Summary statistics: {}", config.summary_stats_path.display());
    tracing::info!("Original images: {}", config.original_images_dir.display());
    tracing::info!("Result images: {}", config.results_images_dir.display());

    // Load pre-computed results
    let dataset = Dataset::load(&config.detection_report_path, &config.summary_stats_path)
        .context("Failed to load detection data")?;

    let available = gallery::list_images(&config.results_images_dir, &config.result_image_extension)
        .await
        .map(|images| images.len())
        .unwrap_or(0);
    tracing::info!("Available images: {}", available);
    tracing::info!(
        "Simulated processing delay: {}-{}s",
        config.analyze_delay_min_secs,
        config.analyze_delay_max_secs
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    // Build router
    let app = create_router(AppState::new(config, dataset));

    // Start server
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
