// libs/appointment-cell/src/services/clock.rs
use chrono::{DateTime, Utc};

/// Source of "now" for the booking path. The offer pipeline itself takes
/// `now` as a plain argument.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
