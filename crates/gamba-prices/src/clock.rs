use chrono::{DateTime, Utc};

/// Time source for staleness decisions and session timestamps.
///
/// Injected rather than read ad hoc so tests can control the clock without
/// sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
