//! Quiet-hours policy - time-of-day window during which notifications are suppressed

use chrono::{DateTime, Local, Timelike};

/// Decides whether notification delivery is currently permitted.
///
/// The awake window is half-open: notifications are allowed while
/// `start_hour <= hour < end_hour` and suppressed outside it. Earlier
/// versions compared the hour against both bounds at once
/// (`hour < start && hour > end`), which can never hold when
/// `start < end`, so suppression silently never fired.
#[derive(Debug, Clone, Copy)]
pub struct QuietHoursPolicy {
    start_hour: u32,
    end_hour: u32,
}

impl QuietHoursPolicy {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self { start_hour, end_hour }
    }

    /// Returns true when delivery is permitted at `now`.
    pub fn is_allowed(&self, now: DateTime<Local>) -> bool {
        let hour = now.hour();
        self.start_hour <= hour && hour < self.end_hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_hour(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 30, hour, 30, 0).unwrap()
    }

    #[test]
    fn test_allowed_inside_awake_window() {
        let policy = QuietHoursPolicy::new(8, 22);
        assert!(policy.is_allowed(at_hour(8)));
        assert!(policy.is_allowed(at_hour(10)));
        assert!(policy.is_allowed(at_hour(21)));
    }

    #[test]
    fn test_suppressed_outside_awake_window() {
        let policy = QuietHoursPolicy::new(8, 22);
        assert!(!policy.is_allowed(at_hour(0)));
        assert!(!policy.is_allowed(at_hour(7)));
        assert!(!policy.is_allowed(at_hour(22))); // end bound is exclusive
        assert!(!policy.is_allowed(at_hour(23)));
    }

    #[test]
    fn test_full_day_window_never_suppresses() {
        let policy = QuietHoursPolicy::new(0, 24);
        for hour in 0..24 {
            assert!(policy.is_allowed(at_hour(hour)), "hour {} should be allowed", hour);
        }
    }
}
