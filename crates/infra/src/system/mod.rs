use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

// Mocking out time so that it is possible to run tests that depend on time.
pub trait ISys: Send + Sync {
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;

    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.get_timestamp_millis())
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// System that gets the real time and is used when not testing
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to
pub struct StaticTimeSys {
    millis: AtomicI64,
}

impl StaticTimeSys {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(now.timestamp_millis()),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.millis.store(now.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.millis
            .fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl ISys for StaticTimeSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_time_only_moves_when_advanced() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let sys = StaticTimeSys::new(start);
        assert_eq!(sys.now(), start);
        sys.advance(chrono::Duration::hours(2));
        assert_eq!(sys.now(), start + chrono::Duration::hours(2));
        sys.set(start);
        assert_eq!(sys.get_timestamp_millis(), start.timestamp_millis());
    }
}
