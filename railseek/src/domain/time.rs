//! Time-of-day handling for schedule rows.
//!
//! The upstream service reports all times as "HH:MM" strings with no
//! date component. `DayTime` stores minutes from midnight, so ordering
//! matches the lexicographic order of the original strings.

use std::fmt;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day in minutes from midnight.
///
/// Parsed from "HH:MM". Plain times are bounded at 23:59; window
/// bounds may additionally be "24:00" (see [`DayTime::parse_bound`]),
/// which sorts after every plain time.
///
/// # Examples
///
/// ```
/// use railseek::domain::DayTime;
///
/// let t = DayTime::parse("14:30").unwrap();
/// assert_eq!(t.to_string(), "14:30");
/// assert!(DayTime::parse("09:05").unwrap() < t);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayTime {
    mins: u16,
}

impl DayTime {
    /// Parse a time from "HH:MM" format. Hours 00-23 only.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let t = Self::parse_bound(s)?;
        if t.mins >= 24 * 60 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        Ok(t)
    }

    /// Parse a window bound from "HH:MM" format.
    ///
    /// Identical to [`DayTime::parse`] except that "24:00" is accepted
    /// as an end-of-day bound.
    pub fn parse_bound(s: &str) -> Result<Self, TimeError> {
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();
        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 24 {
            return Err(TimeError::new("hour must be 0-24"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        if hour == 24 && minute != 0 {
            return Err(TimeError::new("hour 24 only valid as 24:00"));
        }

        Ok(Self {
            mins: (hour * 60 + minute) as u16,
        })
    }

    /// Returns the hour (0-24).
    pub fn hour(&self) -> u16 {
        self.mins / 60
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u16 {
        self.mins % 60
    }

    /// Minutes from midnight.
    pub fn minutes(&self) -> u16 {
        self.mins
    }

    /// Signed gap in minutes from `earlier` to `self`, both projected
    /// onto the same day. Negative when `self` precedes `earlier`.
    pub fn minutes_since(&self, earlier: DayTime) -> i32 {
        self.mins as i32 - earlier.mins as i32
    }
}

impl fmt::Debug for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DayTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
