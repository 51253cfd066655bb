//! Time sources for id generation, debounce deadlines and export dates.

use chrono::{Local, NaiveDate, Utc};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Time source consulted by the session.
pub trait Clock {
    /// Monotonic time since the clock started; drives debounce deadlines.
    fn monotonic(&self) -> Duration;
    /// Wall-clock Unix epoch milliseconds; seeds member ids.
    fn epoch_millis(&self) -> i64;
    /// Local calendar date; stamped on exports.
    fn today(&self) -> NaiveDate;
}

/// Process clock backed by `Instant` and the local time zone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    started_at: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn monotonic(&self) -> Duration {
        self.started_at.elapsed()
    }

    fn epoch_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Hand-driven clock. Clones share the same time, so a test can keep one
/// handle while the session owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    state: Rc<ManualClockState>,
}

#[derive(Debug)]
struct ManualClockState {
    elapsed: Cell<Duration>,
    epoch_millis: Cell<i64>,
    today: Cell<NaiveDate>,
}

impl ManualClock {
    pub fn new(epoch_millis: i64, today: NaiveDate) -> Self {
        Self {
            state: Rc::new(ManualClockState {
                elapsed: Cell::new(Duration::ZERO),
                epoch_millis: Cell::new(epoch_millis),
                today: Cell::new(today),
            }),
        }
    }

    /// Moves monotonic and wall-clock time forward together.
    pub fn advance(&self, by: Duration) {
        self.state.elapsed.set(self.state.elapsed.get() + by);
        let millis = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.state
            .epoch_millis
            .set(self.state.epoch_millis.get().saturating_add(millis));
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.state.today.set(today);
    }
}

impl Clock for ManualClock {
    fn monotonic(&self) -> Duration {
        self.state.elapsed.get()
    }

    fn epoch_millis(&self) -> i64 {
        self.state.epoch_millis.get()
    }

    fn today(&self) -> NaiveDate {
        self.state.today.get()
    }
}
