// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;

use crate::application::chart_widget::ChartWidget;
use crate::application::clock::SystemClock;
use crate::infrastructure::config::{load_meters_config, load_widget_config};
use crate::infrastructure::http_samples::HttpSamplesSource;
use crate::infrastructure::svg_renderer::SvgChartRenderer;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let widget_config = load_widget_config().context("loading config/widget")?;
    let meters_config = load_meters_config().context("loading config/meters")?;

    // Adapters (infrastructure layer)
    let source = Arc::new(HttpSamplesSource::new(
        &widget_config.samples.url,
        Duration::from_secs(widget_config.samples.timeout_secs),
    )?);

    // Widget (application layer); the initial render runs in the background
    let mut widget = ChartWidget::new(source, Arc::new(SvgChartRenderer), Arc::new(SystemClock))
        .with_default_days(widget_config.chart.default_days);
    let _initial_render = widget.initialize(meters_config.meters);

    let state = Arc::new(AppState::new(widget));

    // Build router (presentation layer)
    let app = router(state);

    let addr: SocketAddr = widget_config
        .server
        .listen
        .parse()
        .with_context(|| format!("invalid listen address {}", widget_config.server.listen))?;
    tracing::info!(%addr, samples_url = %widget_config.samples.url, "starting metering-stats");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
