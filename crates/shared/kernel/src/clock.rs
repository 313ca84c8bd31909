use chrono::Utc;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

/// Seconds since the UNIX epoch.
pub type Timestamp = u64;

/// Source of the current time for registry operations.
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock. A system time before 1970 reads as `0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicU64);

impl FixedClock {
    #[must_use]
    pub const fn new(at: Timestamp) -> Self {
        Self(AtomicU64::new(at))
    }

    pub fn set(&self, at: Timestamp) {
        self.0.store(at, Ordering::Relaxed);
    }

    pub fn advance(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::Relaxed);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_moves_only_when_told() {
        let clock = FixedClock::new(1_234_567_890);
        assert_eq!(clock.now(), 1_234_567_890);
        clock.advance(10);
        assert_eq!(clock.now(), 1_234_567_900);
        clock.set(5);
        assert_eq!(clock.now(), 5);
    }

    #[test]
    fn system_clock_reads_utc_seconds() {
        let before = u64::try_from(Utc::now().timestamp()).unwrap();
        let now = SystemClock.now();
        let after = u64::try_from(Utc::now().timestamp()).unwrap();
        assert!(now > 1_577_836_800);
        assert!((before..=after).contains(&now));
    }
}
