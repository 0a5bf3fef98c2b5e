// Infrastructure layer - Configuration and adapters for the widget's ports
pub mod config;
pub mod http_samples;
pub mod svg_renderer;
