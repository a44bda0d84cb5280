//! Time sources.
//!
//! All scheduling math runs on local wall-clock `NaiveDateTime`; only
//! creation timestamps use UTC.

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};
use std::cell::Cell;

/// Source of "now" for classification, projection and reminders.
pub trait Clock {
    /// Current local wall-clock time.
    fn now_local(&self) -> NaiveDateTime;
    /// Current UTC instant, used for `createdAt`.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Reads the operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replay.
///
/// The UTC reading is the local reading interpreted as UTC.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now_local(&self) -> NaiveDateTime {
        self.now.get()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.now.get())
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_local(&self) -> NaiveDateTime {
        (**self).now_local()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        (**self).now_utc()
    }
}
