// Application layer - The chart widget and the ports it drives
pub mod chart_renderer;
pub mod chart_surface;
pub mod chart_widget;
pub mod clock;
pub mod error;
pub mod samples_source;
#[cfg(test)]
pub mod testing;
