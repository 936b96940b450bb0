//! Time source for id allocation and join dates.

use chrono::{NaiveDate, Utc};

/// Wall-clock seam so creation paths can be driven deterministically.
pub trait Clock {
    /// Unix epoch milliseconds.
    fn now_millis(&self) -> i64;
    /// Current calendar date in UTC.
    fn today(&self) -> NaiveDate;
}

/// Production clock backed by `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    pub millis: i64,
    pub today: NaiveDate,
}

impl FixedClock {
    pub fn new(millis: i64, today: NaiveDate) -> Self {
        Self { millis, today }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.millis
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
