//! Time-window filters.

use super::time::{DayTime, TimeError};

/// An inclusive time-of-day window, possibly spanning midnight.
///
/// Parsed from a string with two "HH:MM" bounds separated by a comma,
/// semicolon, space or hyphen ("12:00-18:00", "22:00,02:00"). A missing
/// start defaults to 00:00, a missing end to 24:00. When the end bound
/// precedes the start bound the window wraps past midnight and
/// membership becomes `t >= start || t <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DayTime,
    end: DayTime,
}

impl TimeWindow {
    /// Parse a window string.
    ///
    /// # Examples
    ///
    /// ```
    /// use railseek::domain::{DayTime, TimeWindow};
    ///
    /// let w = TimeWindow::parse("06:00-12:00").unwrap();
    /// assert!(w.contains(DayTime::parse("06:00").unwrap()));
    /// assert!(w.contains(DayTime::parse("12:00").unwrap()));
    /// assert!(!w.contains(DayTime::parse("12:01").unwrap()));
    ///
    /// // Wraps past midnight
    /// let w = TimeWindow::parse("22:00-02:00").unwrap();
    /// assert!(w.contains(DayTime::parse("23:59").unwrap()));
    /// assert!(w.contains(DayTime::parse("00:01").unwrap()));
    /// assert!(!w.contains(DayTime::parse("12:00").unwrap()));
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.split([',', ';', ' ', '-']);
        let start_raw = parts.next().unwrap_or("");
        let end_raw = parts.next().unwrap_or("");

        // An empty bound is a missing bound.
        let start = if start_raw.is_empty() {
            DayTime::parse_bound("00:00")?
        } else {
            DayTime::parse_bound(start_raw)?
        };
        let end = if end_raw.is_empty() {
            DayTime::parse_bound("24:00")?
        } else {
            DayTime::parse_bound(end_raw)?
        };

        Ok(Self { start, end })
    }

    /// Membership test with inclusive bounds.
    pub fn contains(&self, t: DayTime) -> bool {
        if self.start > self.end {
            // Spans midnight
            t >= self.start || t <= self.end
        } else {
            self.start <= t && t <= self.end
        }
    }

    /// The start bound.
    pub fn start(&self) -> DayTime {
        self.start
    }

    /// The end bound.
    pub fn end(&self) -> DayTime {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> DayTime {
        DayTime::parse(s).unwrap()
    }

    #[test]
    fn inclusive_at_both_boundaries() {
        let w = TimeWindow::parse("06:00-12:00").unwrap();
        assert!(w.contains(t("06:00")));
        assert!(w.contains(t("12:00")));
        assert!(w.contains(t("09:30")));
        assert!(!w.contains(t("05:59")));
        assert!(!w.contains(t("12:01")));
    }

    #[test]
    fn flexible_separators() {
        for s in ["06:00-12:00", "06:00,12:00", "06:00;12:00", "06:00 12:00"] {
            let w = TimeWindow::parse(s).unwrap();
            assert!(w.contains(t("09:00")), "separator failed for {s:?}");
            assert!(!w.contains(t("13:00")), "separator failed for {s:?}");
        }
    }

    #[test]
    fn missing_start_defaults_to_midnight() {
        let w = TimeWindow::parse("-12:00").unwrap();
        assert!(w.contains(t("00:00")));
        assert!(w.contains(t("12:00")));
        assert!(!w.contains(t("12:01")));
    }

    #[test]
    fn missing_end_defaults_to_end_of_day() {
        let w = TimeWindow::parse("18:00").unwrap();
        assert!(w.contains(t("18:00")));
        assert!(w.contains(t("23:59")));
        assert!(!w.contains(t("17:59")));
    }

    #[test]
    fn wrap_past_midnight() {
        let w = TimeWindow::parse("22:00-02:00").unwrap();
        assert!(w.contains(t("22:00")));
        assert!(w.contains(t("23:59")));
        assert!(w.contains(t("00:01")));
        assert!(w.contains(t("02:00")));
        assert!(!w.contains(t("02:01")));
        assert!(!w.contains(t("21:59")));
        assert!(!w.contains(t("12:00")));
    }

    #[test]
    fn invalid_bounds_rejected() {
        assert!(TimeWindow::parse("25:00-26:00").is_err());
        assert!(TimeWindow::parse("junk").is_err());
        assert!(TimeWindow::parse("12:0x-18:00").is_err());
    }

    #[test]
    fn end_of_day_bound_accepted() {
        let w = TimeWindow::parse("18:00-24:00").unwrap();
        assert!(w.contains(t("23:59")));
        assert!(!w.contains(t("17:00")));
    }
}
