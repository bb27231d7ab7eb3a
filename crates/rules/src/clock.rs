//! Strictly increasing millisecond stamps for evaluation passes.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

/// Hands out evaluation timestamps that never repeat.
///
/// Alert ids embed the stamp, so two passes within the same millisecond
/// would otherwise produce colliding ids. Each call returns
/// `max(now, previous + 1ms)`.
#[derive(Debug, Default)]
pub struct EvaluationClock {
    last_millis: AtomicI64,
}

impl EvaluationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next stamp based on the wall clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.next(Utc::now())
    }

    /// Next stamp at or after `now`.
    pub fn next(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let wanted = now.timestamp_millis();
        let prev = self
            .last_millis
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(wanted.max(last.saturating_add(1)))
            })
            .unwrap_or(wanted);
        let issued = wanted.max(prev.saturating_add(1));
        Utc.timestamp_millis_opt(issued).single().unwrap_or(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_strictly_increase_within_one_millisecond() {
        let clock = EvaluationClock::new();
        let fixed = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let a = clock.next(fixed);
        let b = clock.next(fixed);
        let c = clock.next(fixed);
        assert_eq!(a, fixed);
        assert_eq!(b.timestamp_millis(), a.timestamp_millis() + 1);
        assert_eq!(c.timestamp_millis(), a.timestamp_millis() + 2);
    }

    #[test]
    fn later_wall_clock_is_used_directly() {
        let clock = EvaluationClock::new();
        let t0 = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let t1 = Utc.timestamp_millis_opt(1_700_000_005_000).unwrap();
        clock.next(t0);
        assert_eq!(clock.next(t1), t1);
    }

    #[test]
    fn clock_going_backwards_still_advances() {
        let clock = EvaluationClock::new();
        let t1 = Utc.timestamp_millis_opt(1_700_000_005_000).unwrap();
        let t0 = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let a = clock.next(t1);
        let b = clock.next(t0);
        assert!(b > a);
    }
}
