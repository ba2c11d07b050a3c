//! Notification rate limiting - at most one acceptance per rolling window

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Enforces a minimum interval between accepted notifications.
///
/// One limiter is shared by every trigger path (hardware edge and HTTP),
/// so the check-and-update runs under a single lock guard. Two callers
/// racing on a stale timestamp would both reach the delivery channels,
/// which is exactly what this type exists to prevent.
pub struct RateLimiter {
    interval: Duration,
    last_sent: Mutex<Option<DateTime<Utc>>>,
}

impl RateLimiter {
    pub fn new(interval_secs: i64) -> Self {
        Self {
            interval: Duration::seconds(interval_secs),
            last_sent: Mutex::new(None),
        }
    }

    /// Returns true and records `now` iff more than the configured interval
    /// has elapsed since the last accepted notification. Rejections leave
    /// the recorded timestamp untouched.
    pub fn try_acquire(&self, now: DateTime<Utc>) -> bool {
        let mut last_sent = self.last_sent.lock();
        match *last_sent {
            Some(last) if now - last <= self.interval => false,
            _ => {
                *last_sent = Some(now);
                true
            }
        }
    }

    /// Timestamp of the last accepted notification, if any.
    pub fn last_sent(&self) -> Option<DateTime<Utc>> {
        *self.last_sent.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_first_acquire_succeeds() {
        let limiter = RateLimiter::new(60);
        assert!(limiter.try_acquire(at(0)));
        assert_eq!(limiter.last_sent(), Some(at(0)));
    }

    #[test]
    fn test_second_acquire_within_window_fails() {
        let limiter = RateLimiter::new(60);
        assert!(limiter.try_acquire(at(0)));
        assert!(!limiter.try_acquire(at(2)));
        // Rejection must not reset the window
        assert_eq!(limiter.last_sent(), Some(at(0)));
    }

    #[test]
    fn test_acquire_after_window_succeeds() {
        let limiter = RateLimiter::new(60);
        assert!(limiter.try_acquire(at(0)));
        assert!(limiter.try_acquire(at(61)));
        assert_eq!(limiter.last_sent(), Some(at(61)));
    }

    #[test]
    fn test_exactly_at_boundary_fails() {
        // The contract is strictly greater than the interval
        let limiter = RateLimiter::new(60);
        assert!(limiter.try_acquire(at(0)));
        assert!(!limiter.try_acquire(at(60)));
    }

    #[test]
    fn test_concurrent_acquire_admits_exactly_one() {
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::new(60));
        let now = at(0);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || limiter.try_acquire(now))
            })
            .collect();
        let accepted = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(accepted, 1);
    }
}
