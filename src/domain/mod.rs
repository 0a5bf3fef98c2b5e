// Domain layer - Meters, samples, date ranges and the chart model
pub mod chart;
pub mod date_picker;
pub mod date_range;
pub mod meter;
pub mod sample;
pub mod time_ticks;
