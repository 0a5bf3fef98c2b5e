// Date range selected for a chart
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Format of `from`/`to` in the samples query and the chart title.
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive day range. Always satisfies `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    /// Build a range, shifting `to` to the day after `from` when they are out of order.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        let mut range = Self { from: to, to };
        range.set_from(from);
        range
    }

    /// `to = today`, `from = today - days_back`.
    pub fn ending_on(today: NaiveDate, days_back: u32) -> Self {
        let from = today
            .checked_sub_days(Days::new(u64::from(days_back)))
            .unwrap_or(NaiveDate::MIN);
        Self { from, to: today }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Move `from`. Returns true when `to` had to be pushed to `from + 1 day`.
    pub fn set_from(&mut self, from: NaiveDate) -> bool {
        self.from = from;
        if from > self.to {
            self.to = from.checked_add_days(Days::new(1)).unwrap_or(from);
            return true;
        }
        false
    }

    /// Whether `date` may be picked as the end of the range.
    pub fn accepts_to(&self, date: NaiveDate) -> bool {
        date > self.from
    }

    pub(crate) fn set_to_unchecked(&mut self, to: NaiveDate) {
        self.to = to;
    }

    /// Datetime window the samples endpoint covers: `from 00:00:00 ..= to 23:59:59`.
    pub fn window(&self) -> (NaiveDateTime, NaiveDateTime) {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        (self.from.and_time(NaiveTime::MIN), self.to.and_time(end_of_day))
    }

    pub fn from_param(&self) -> String {
        self.from.format(QUERY_DATE_FORMAT).to_string()
    }

    pub fn to_param(&self) -> String {
        self.to.format(QUERY_DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, QUERY_DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_ending_on() {
        let today = day("2024-03-01");
        for n in [0u32, 1, 7, 30, 365] {
            let range = DateRange::ending_on(today, n);
            assert_eq!(range.to(), today);
            assert_eq!(range.from(), today - chrono::Duration::days(i64::from(n)));
        }
        // Crosses a leap day.
        assert_eq!(DateRange::ending_on(today, 1).from(), day("2024-02-29"));
    }

    #[test]
    fn test_set_from_past_to_shifts_to() {
        let mut range = DateRange::new(day("2024-01-01"), day("2024-01-02"));
        assert!(range.set_from(day("2024-01-10")));
        assert_eq!(range.from(), day("2024-01-10"));
        assert_eq!(range.to(), day("2024-01-11"));
    }

    #[test]
    fn test_set_from_within_range_keeps_to() {
        let mut range = DateRange::new(day("2024-01-01"), day("2024-01-05"));
        assert!(!range.set_from(day("2024-01-05")));
        assert_eq!(range.to(), day("2024-01-05"));
    }

    #[test]
    fn test_new_orders_dates() {
        let range = DateRange::new(day("2024-01-05"), day("2024-01-01"));
        assert_eq!(range.from(), day("2024-01-05"));
        assert_eq!(range.to(), day("2024-01-06"));
    }

    #[test]
    fn test_accepts_to_is_strictly_after_from() {
        let range = DateRange::new(day("2024-01-05"), day("2024-01-06"));
        assert!(!range.accepts_to(day("2024-01-04")));
        assert!(!range.accepts_to(day("2024-01-05")));
        assert!(range.accepts_to(day("2024-01-06")));
    }

    #[test]
    fn test_params_and_window() {
        let range = DateRange::new(day("2024-01-01"), day("2024-01-02"));
        assert_eq!(range.from_param(), "2024-01-01");
        assert_eq!(range.to_param(), "2024-01-02");
        let (start, end) = range.window();
        assert_eq!(start.to_string(), "2024-01-01 00:00:00");
        assert_eq!(end.to_string(), "2024-01-02 23:59:59");
    }
}
