// Sample domain model
use chrono::NaiveDateTime;

/// Timestamp format of the `date` column in the samples payload.
pub const SAMPLE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Parse one `date`/`value` row. Returns `None` for malformed rows.
    pub fn parse(date: &str, value: &str) -> Option<Self> {
        let timestamp = NaiveDateTime::parse_from_str(date.trim(), SAMPLE_DATE_FORMAT).ok()?;
        let value = value.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
        Some(Self { timestamp, value })
    }
}

/// [min, max] of the sample timestamps, `None` when empty.
pub fn time_extent(samples: &[Sample]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let first = samples.first()?.timestamp;
    Some(samples.iter().fold((first, first), |(lo, hi), s| {
        (lo.min(s.timestamp), hi.max(s.timestamp))
    }))
}

/// [min, max] of the sample values, `None` when empty.
pub fn value_extent(samples: &[Sample]) -> Option<(f64, f64)> {
    let first = samples.first()?.value;
    Some(samples.iter().fold((first, first), |(lo, hi), s| {
        (lo.min(s.value), hi.max(s.value))
    }))
}
