use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use parking_lot::Mutex;

/// Time source for the deck. Instants are kept at millisecond precision so
/// they survive the epoch-millisecond persisted form unchanged.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    /// Learner-local calendar date used for the daily counters.
    fn today(&self) -> NaiveDate;
}

pub fn truncate_to_millis(t: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(t.timestamp_millis()).unwrap_or(t)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        truncate_to_millis(Utc::now())
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually driven clock. Its calendar date is the UTC date of `now`.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(truncate_to_millis(start)),
        }
    }

    pub fn set(&self, t: DateTime<Utc>) {
        *self.now.lock() = truncate_to_millis(t);
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now = truncate_to_millis(*now + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    fn today(&self) -> NaiveDate {
        self.now.lock().date_naive()
    }
}
