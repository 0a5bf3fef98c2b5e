// Presentation layer - HTTP surface of the hosted widget
pub mod app_state;
pub mod handlers;
