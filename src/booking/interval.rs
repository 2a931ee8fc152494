//! Half-open time interval model.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::BookingError;

/// A half-open interval `[start, end)` of wall-clock time within one day.
///
/// The end boundary is exclusive, so `[10:00, 11:00)` and `[11:00, 12:00)`
/// share the 11:00 boundary without overlapping. Construction rejects
/// `start >= end`; a malformed pair is never swapped into a valid one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, BookingError> {
        if start >= end {
            return Err(BookingError::invalid(format!(
                "start {start} must be before end {end}"
            )));
        }
        Ok(TimeRange { start, end })
    }

    /// Wrap an already-validated pair, e.g. one read back from storage.
    pub(crate) fn new_unchecked(start: NaiveTime, end: NaiveTime) -> Self {
        debug_assert!(start < end, "stored interval violates start < end");
        TimeRange { start, end }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }

    /// Half-open overlap test: `[a, b)` and `[c, d)` overlap iff
    /// `a < d && c < b`. Touching boundaries do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, instant: NaiveTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn range(a: (u32, u32), b: (u32, u32)) -> TimeRange {
        TimeRange::new(t(a.0, a.1), t(b.0, b.1)).unwrap()
    }

    #[test]
    fn rejects_reversed_and_empty() {
        assert!(TimeRange::new(t(15, 0), t(14, 0)).is_err());
        assert!(TimeRange::new(t(14, 0), t(14, 0)).is_err());
        assert!(TimeRange::new(t(14, 0), t(14, 1)).is_ok());
    }

    #[test]
    fn partial_overlap() {
        let a = range((10, 0), (12, 0));
        let b = range((11, 0), (13, 0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn nested_overlap() {
        let outer = range((10, 0), (14, 0));
        let inner = range((11, 0), (12, 0));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn identical_ranges_overlap() {
        let a = range((9, 0), (10, 0));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn touching_boundaries_do_not_overlap() {
        let morning = range((10, 0), (11, 0));
        let midday = range((11, 0), (12, 0));
        assert!(!morning.overlaps(&midday));
        assert!(!midday.overlaps(&morning));
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        let a = range((8, 0), (9, 0));
        let b = range((17, 0), (18, 0));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn duration_and_contains() {
        let a = range((18, 0), (19, 30));
        assert_eq!(a.duration(), Duration::minutes(90));
        assert!(a.contains(t(18, 0)));
        assert!(a.contains(t(19, 29)));
        assert!(!a.contains(t(19, 30)));
        assert!(!a.contains(t(17, 59)));
    }
}
