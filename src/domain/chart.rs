// Chart model: layout, scales and marks derived on every render
use super::date_range::DateRange;
use super::meter::MeterDescriptor;
use super::sample::{time_extent, value_extent, Sample};
use super::time_ticks::TickInterval;
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

/// steelblue
pub const SERIES_COLOR: (u8, u8, u8) = (70, 130, 180);
pub const LINE_WIDTH: f64 = 1.5;
pub const BAR_WIDTH: f64 = 5.0;
pub const TITLE_FONT_SIZE: u32 = 14;
pub const AXIS_FONT_SIZE: u32 = 10;
pub const X_TICK_COUNT: usize = 10;
pub const TICK_SIZE: u32 = 6;
/// Gap between the axis line and the top of a tick label.
pub const TICK_LABEL_PADDING: u32 = 9;

/// Tick format of the rotated bottom axis used for non-cumulative meters.
pub const ROTATED_TICK_FORMAT: &str = "%m-%d %H:%M:%S";
pub const ROTATED_TICK_ANGLE: f64 = -65.0;
/// Label offsets of the rotated axis, in em.
pub const ROTATED_TICK_DX_EM: f64 = -0.8;
pub const ROTATED_TICK_DY_EM: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    pub margin: Margin,
    /// Plot width, margins excluded.
    pub width: u32,
    /// Plot height, margins excluded.
    pub height: u32,
}

impl Default for ChartLayout {
    fn default() -> Self {
        let margin = Margin {
            top: 40,
            right: 100,
            bottom: 80,
            left: 200,
        };
        Self {
            margin,
            width: 1100 - margin.left - margin.right,
            height: 480 - margin.top - margin.bottom,
        }
    }
}

impl ChartLayout {
    pub fn canvas_size(&self) -> (u32, u32) {
        (
            self.width + self.margin.left + self.margin.right,
            self.height + self.margin.top + self.margin.bottom,
        )
    }
}

/// Linear map from a domain onto a pixel range.
/// A zero-width domain maps everything to the start of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, v: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            return self.range.0;
        }
        self.range.0 + (v - self.domain.0) / span * (self.range.1 - self.range.0)
    }
}

pub fn epoch_millis(t: NaiveDateTime) -> f64 {
    t.and_utc().timestamp_millis() as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesShape {
    Line,
    Bars,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAxisStyle {
    /// Default multi-scale time labels, horizontal.
    Plain,
    /// `ROTATED_TICK_FORMAT` labels rotated by `ROTATED_TICK_ANGLE`, anchored at their end.
    Rotated,
}

impl XAxisStyle {
    pub fn tick_label(self, t: NaiveDateTime) -> String {
        match self {
            XAxisStyle::Plain => default_time_label(t),
            XAxisStyle::Rotated => t.format(ROTATED_TICK_FORMAT).to_string(),
        }
    }
}

/// Picks the coarsest unit that still distinguishes `t`, like a time axis does by default.
/// Midnights show the weekday unless they fall on a Sunday or a month start.
pub fn default_time_label(t: NaiveDateTime) -> String {
    let fmt = if t.nanosecond() != 0 {
        ".%3f"
    } else if t.second() != 0 {
        ":%S"
    } else if t.minute() != 0 {
        "%I:%M"
    } else if t.hour() != 0 {
        "%I %p"
    } else if t.weekday() != Weekday::Sun && t.day() != 1 {
        "%a %d"
    } else if t.day() != 1 {
        "%b %d"
    } else if t.month() != 1 {
        "%B"
    } else {
        "%Y"
    };
    t.format(fmt).to_string()
}

/// An x axis tick, in plot-local pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub x: f64,
    pub label: String,
}

/// A drawn series element, in plot-local pixels (origin at the plot's top-left corner).
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Line { points: Vec<(f64, f64)> },
    Bar { x: f64, y: f64, width: f64, height: f64 },
}

/// Everything a render needs to know about the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub meter: MeterDescriptor,
    pub resource: String,
    pub range: DateRange,
}

impl ChartRequest {
    pub fn title(&self) -> String {
        format!(
            "{} for resource {} (From {} to {})",
            self.meter.name,
            self.resource,
            self.range.from_param(),
            self.range.to_param()
        )
    }

    pub fn y_label(&self) -> String {
        format!("Value ({})", self.meter.unit)
    }

    pub fn shape(&self) -> SeriesShape {
        if self.meter.meter_type.is_cumulative() {
            SeriesShape::Line
        } else {
            SeriesShape::Bars
        }
    }

    pub fn x_axis(&self) -> XAxisStyle {
        if self.meter.meter_type.is_cumulative() {
            XAxisStyle::Plain
        } else {
            XAxisStyle::Rotated
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub layout: ChartLayout,
    pub title: String,
    pub y_label: String,
    pub shape: SeriesShape,
    pub x_axis: XAxisStyle,
    /// `None` when there are no samples.
    pub x_domain: Option<(NaiveDateTime, NaiveDateTime)>,
    /// `None` when there are no samples.
    pub y_domain: Option<(f64, f64)>,
    /// Requested window, used for the x axis when there is no domain.
    pub window: (NaiveDateTime, NaiveDateTime),
    pub x_ticks: Vec<Tick>,
    pub marks: Vec<Mark>,
}

impl ChartModel {
    pub fn build(request: &ChartRequest, samples: &[Sample]) -> Self {
        let mut model = Self {
            layout: ChartLayout::default(),
            title: request.title(),
            y_label: request.y_label(),
            shape: request.shape(),
            x_axis: request.x_axis(),
            x_domain: time_extent(samples),
            y_domain: value_extent(samples),
            window: request.range.window(),
            x_ticks: Vec::new(),
            marks: Vec::new(),
        };
        model.x_ticks = model.build_x_ticks();
        model.marks = model.build_marks(samples);
        model
    }

    pub fn x_scale(&self) -> LinearScale {
        let (start, end) = self.x_domain.unwrap_or(self.window);
        LinearScale::new(
            (epoch_millis(start), epoch_millis(end)),
            (0.0, f64::from(self.layout.width)),
        )
    }

    pub fn y_scale(&self) -> LinearScale {
        LinearScale::new(
            self.y_domain.unwrap_or((0.0, 1.0)),
            (f64::from(self.layout.height), 0.0),
        )
    }

    fn build_x_ticks(&self) -> Vec<Tick> {
        let (start, end) = self.x_domain.unwrap_or(self.window);
        let scale = self.x_scale();
        TickInterval::for_span(start, end, X_TICK_COUNT)
            .ticks(start, end)
            .into_iter()
            .map(|t| Tick {
                x: scale.map(epoch_millis(t)),
                label: self.x_axis.tick_label(t),
            })
            .collect()
    }

    fn build_marks(&self, samples: &[Sample]) -> Vec<Mark> {
        if samples.is_empty() {
            return Vec::new();
        }
        let x = self.x_scale();
        let y = self.y_scale();
        let bottom = f64::from(self.layout.height);

        match self.shape {
            SeriesShape::Line => {
                let mut ordered: Vec<&Sample> = samples.iter().collect();
                ordered.sort_by_key(|s| s.timestamp);
                let points = ordered
                    .into_iter()
                    .map(|s| (x.map(epoch_millis(s.timestamp)), y.map(s.value)))
                    .collect();
                vec![Mark::Line { points }]
            }
            SeriesShape::Bars => samples
                .iter()
                .map(|s| {
                    let top = y.map(s.value);
                    Mark::Bar {
                        x: x.map(epoch_millis(s.timestamp)),
                        y: top,
                        width: BAR_WIDTH,
                        height: bottom - top,
                    }
                })
                .collect(),
        }
    }
}
