// Application state for HTTP handlers
use crate::application::chart_surface::ChartSurface;
use crate::application::chart_widget::ChartWidget;
use tokio::sync::Mutex;

pub struct AppState {
    pub widget: Mutex<ChartWidget>,
    pub surface: ChartSurface,
}

impl AppState {
    pub fn new(widget: ChartWidget) -> Self {
        let surface = widget.surface().clone();
        Self {
            widget: Mutex::new(widget),
            surface,
        }
    }
}
