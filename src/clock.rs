use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Local, NaiveDateTime};

/// Source of the local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to a settable instant.
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            millis: AtomicI64::new(now.and_utc().timestamp_millis()),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.millis
            .store(now.and_utc().timestamp_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst))
            .map(|dt| dt.naive_utc())
            .unwrap_or_default()
    }
}
