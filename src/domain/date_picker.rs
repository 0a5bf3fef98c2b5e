// Paired from/to date pickers
use super::date_range::DateRange;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PickerState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    #[default]
    None,
    From,
    To,
}

/// What the caller should do after a picker transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEffect {
    Nothing,
    Render,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("date {date} is disabled: the range end must be after {from}")]
pub struct DisabledDate {
    pub date: NaiveDate,
    pub from: NaiveDate,
}

/// The two dependent pickers. Every selection commits immediately; there is no cancel state.
#[derive(Debug, Clone, Serialize)]
pub struct DatePickerPair {
    range: DateRange,
    from_picker: PickerState,
    to_picker: PickerState,
    focus: Focus,
}

impl DatePickerPair {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            from_picker: PickerState::Closed,
            to_picker: PickerState::Closed,
            focus: Focus::None,
        }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn from_picker(&self) -> PickerState {
        self.from_picker
    }

    pub fn to_picker(&self) -> PickerState {
        self.to_picker
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Replace both dates without going through the pickers.
    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
    }

    pub fn open_from(&mut self) {
        self.from_picker = PickerState::Open;
        self.focus = Focus::From;
    }

    pub fn open_to(&mut self) {
        self.to_picker = PickerState::Open;
        self.focus = Focus::To;
    }

    /// Dates shown disabled in the `to` calendar: everything up to and including `from`.
    pub fn is_disabled_for_to(&self, date: NaiveDate) -> bool {
        !self.range.accepts_to(date)
    }

    /// Commit a `from` date. Closes the `from` popup and hands focus to `to` without opening it.
    pub fn pick_from(&mut self, date: NaiveDate) -> PickerEffect {
        if self.range.set_from(date) {
            tracing::debug!(from = %date, to = %self.range.to(), "range end moved past new start");
        }
        self.from_picker = PickerState::Closed;
        self.focus = Focus::To;
        PickerEffect::Nothing
    }

    /// Commit a `to` date. Disabled dates are rejected and change nothing.
    pub fn pick_to(&mut self, date: NaiveDate) -> Result<PickerEffect, DisabledDate> {
        if self.is_disabled_for_to(date) {
            return Err(DisabledDate {
                date,
                from: self.range.from(),
            });
        }
        self.range.set_to_unchecked(date);
        self.to_picker = PickerState::Closed;
        Ok(PickerEffect::Render)
    }
}
