// Renderer port: turns a chart model into a drawable document
use crate::application::error::WidgetError;
use crate::domain::chart::ChartModel;

pub trait ChartRenderer: Send + Sync {
    fn render(&self, model: &ChartModel) -> Result<String, WidgetError>;
}
