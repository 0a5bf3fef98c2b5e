// HTTP request handlers
use crate::application::chart_widget::{WidgetEvent, WidgetSnapshot};
use crate::domain::meter::MeterDescriptor;
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/meters", get(list_meters))
        .route("/widget", get(widget_snapshot))
        .route("/widget/events", post(widget_event))
        .route("/widget/chart.svg", get(chart_svg))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Descriptors the widget was initialized with
pub async fn list_meters(State(state): State<Arc<AppState>>) -> Json<Vec<MeterDescriptor>> {
    let widget = state.widget.lock().await;
    Json(widget.meters().to_vec())
}

pub async fn widget_snapshot(State(state): State<Arc<AppState>>) -> Json<WidgetSnapshot> {
    Json(state.widget.lock().await.snapshot())
}

/// Apply one event and wait for the render it started, if any
pub async fn widget_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<WidgetEvent>,
) -> Response {
    // The lock is released before awaiting the render so other events can supersede it.
    let handled = state.widget.lock().await.handle(event);

    let render = match handled {
        Ok(render) => render,
        Err(e) if e.is_rejected_event() => {
            tracing::warn!(error = %e, "event rejected");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "event failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    if let Some(render) = render {
        match render.await {
            Ok(outcome) => tracing::debug!(?outcome, "render settled"),
            Err(e) => tracing::error!(error = %e, "render task aborted"),
        }
    }

    Json(state.widget.lock().await.snapshot()).into_response()
}

/// The chart currently on the surface
pub async fn chart_svg(State(state): State<Arc<AppState>>) -> Response {
    match state.surface.chart() {
        Some(chart) => (
            [(header::CONTENT_TYPE, "image/svg+xml")],
            chart.svg.clone(),
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
