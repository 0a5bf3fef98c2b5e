// Time-aligned tick positions for the chart's x axis
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

const SECOND: i64 = 1_000;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Step between two ticks. Calendar steps land on midnights, Sundays, month and year starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickInterval {
    Millis(i64),
    Days(u32),
    Week,
    Months(u32),
    Years(i32),
}

/// Candidate steps with their approximate length, shortest first.
const INTERVALS: [(TickInterval, i64); 17] = [
    (TickInterval::Millis(SECOND), SECOND),
    (TickInterval::Millis(5 * SECOND), 5 * SECOND),
    (TickInterval::Millis(15 * SECOND), 15 * SECOND),
    (TickInterval::Millis(30 * SECOND), 30 * SECOND),
    (TickInterval::Millis(MINUTE), MINUTE),
    (TickInterval::Millis(5 * MINUTE), 5 * MINUTE),
    (TickInterval::Millis(15 * MINUTE), 15 * MINUTE),
    (TickInterval::Millis(30 * MINUTE), 30 * MINUTE),
    (TickInterval::Millis(HOUR), HOUR),
    (TickInterval::Millis(3 * HOUR), 3 * HOUR),
    (TickInterval::Millis(6 * HOUR), 6 * HOUR),
    (TickInterval::Millis(12 * HOUR), 12 * HOUR),
    (TickInterval::Days(1), DAY),
    (TickInterval::Days(2), 2 * DAY),
    (TickInterval::Week, WEEK),
    (TickInterval::Months(1), MONTH),
    (TickInterval::Months(3), 3 * MONTH),
];

impl TickInterval {
    /// The candidate step closest to splitting `[start, end]` into `count` parts.
    pub fn for_span(start: NaiveDateTime, end: NaiveDateTime, count: usize) -> Self {
        let span = (end - start).num_milliseconds();
        let target = span as f64 / count.max(1) as f64;
        if target <= 0.0 {
            return TickInterval::Millis(SECOND);
        }

        match INTERVALS.iter().position(|&(_, len)| len as f64 > target) {
            None => TickInterval::Years(nice_step(target / YEAR as f64).max(1.0) as i32),
            Some(0) => TickInterval::Millis(nice_step(target).max(1.0) as i64),
            Some(i) => {
                let (below, below_len) = INTERVALS[i - 1];
                let (above, above_len) = INTERVALS[i];
                if target / (below_len as f64) < above_len as f64 / target {
                    below
                } else {
                    above
                }
            }
        }
    }

    /// Every tick of this interval inside `[start, end]`, ascending.
    pub fn ticks(self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDateTime> {
        let mut ticks = Vec::new();
        if start > end {
            return ticks;
        }

        match self {
            TickInterval::Millis(step) => {
                let (first, last) = (millis(start), millis(end));
                let mut t = -(-first).div_euclid(step) * step;
                while t <= last {
                    if let Some(at) = DateTime::from_timestamp_millis(t) {
                        ticks.push(at.naive_utc());
                    }
                    t += step;
                }
            }
            TickInterval::Days(n) => {
                let mut day = first_midnight(start);
                while let Some(d) = day.filter(|d| midnight(*d) <= end) {
                    if d.day0() % n == 0 {
                        ticks.push(midnight(d));
                    }
                    day = d.succ_opt();
                }
            }
            TickInterval::Week => {
                let mut day = first_midnight(start);
                while let Some(d) = day.filter(|d| midnight(*d) <= end) {
                    if d.weekday() == Weekday::Sun {
                        ticks.push(midnight(d));
                        day = d.checked_add_days(chrono::Days::new(7));
                    } else {
                        day = d.succ_opt();
                    }
                }
            }
            TickInterval::Months(n) => {
                let mut month = NaiveDate::from_ymd_opt(start.year(), start.month(), 1);
                while let Some(m) = month.filter(|m| midnight(*m) <= end) {
                    if midnight(m) >= start && m.month0() % n == 0 {
                        ticks.push(midnight(m));
                    }
                    month = m.checked_add_months(Months::new(1));
                }
            }
            TickInterval::Years(n) => {
                let mut year = start.year();
                while let Some(y) = NaiveDate::from_ymd_opt(year, 1, 1).filter(|y| midnight(*y) <= end) {
                    if midnight(y) >= start && year % n == 0 {
                        ticks.push(midnight(y));
                    }
                    year += 1;
                }
            }
        }
        ticks
    }
}

/// 1, 2 or 5 times a power of ten, nearest to `target`.
fn nice_step(target: f64) -> f64 {
    if target <= 0.0 {
        return 1.0;
    }
    let base = 10f64.powf(target.log10().floor());
    let error = target / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    base * factor
}

fn millis(t: NaiveDateTime) -> i64 {
    t.and_utc().timestamp_millis()
}

fn midnight(d: NaiveDate) -> NaiveDateTime {
    d.and_time(NaiveTime::MIN)
}

fn first_midnight(t: NaiveDateTime) -> Option<NaiveDate> {
    if t.time() == NaiveTime::MIN {
        Some(t.date())
    } else {
        t.date().succ_opt()
    }
}
