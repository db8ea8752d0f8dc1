//! Two-leg transfer itineraries.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::time::DayTime;
use super::train::Train;

/// Minutes in a day.
const DAY_MINS: i32 = 24 * 60;

/// A transfer itinerary: two legs through a common station plus the
/// connection gap between them.
///
/// Can only be built through [`Transfer::connect`], which enforces the
/// feasibility rule, so every value represents a workable connection.
/// Equality and ordering delegate to the first leg.
#[derive(Debug, Clone)]
pub struct Transfer {
    pub first: Train,
    pub second: Train,
    /// Normalized connection gap in minutes (24h added when the
    /// connection wraps past midnight). Always positive.
    gap_mins: i32,
}

impl Transfer {
    /// Pair two legs if the connection fits within `interval_mins`.
    ///
    /// The gap is the signed difference between the first leg's arrival
    /// and the second leg's departure, both projected onto one calendar
    /// day. A pair is kept when the gap is positive and strictly below
    /// the interval (same-day change), or when it is negative but still
    /// below `interval - 24h` (the change waits past midnight for the
    /// next day's departure). In the wrap case the stored gap is
    /// normalized by adding 24 hours.
    ///
    /// # Examples
    ///
    /// ```
    /// use railseek::domain::{DayTime, Train, Transfer};
    ///
    /// fn leg(dep: &str, arr: &str) -> Train {
    ///     Train {
    ///         full_no: dep.into(),
    ///         no: "G1".into(),
    ///         from_code: String::new(),
    ///         to_code: String::new(),
    ///         from_name: String::new(),
    ///         to_name: String::new(),
    ///         departure: DayTime::parse(dep).unwrap(),
    ///         arrival: DayTime::parse(arr).unwrap(),
    ///         duration: String::new(),
    ///         seats: vec![],
    ///     }
    /// }
    ///
    /// // Overnight wait: arrive 23:30, depart 00:15 next day.
    /// let t = Transfer::connect(leg("20:00", "23:30"), leg("00:15", "05:00"), 120).unwrap();
    /// assert_eq!(t.gap_display(), "00:45");
    /// ```
    pub fn connect(first: Train, second: Train, interval_mins: i32) -> Option<Self> {
        let gap = second.departure.minutes_since(first.arrival);

        if gap > 0 && gap < interval_mins {
            Some(Self {
                first,
                second,
                gap_mins: gap,
            })
        } else if gap < 0 && gap < interval_mins - DAY_MINS {
            Some(Self {
                first,
                second,
                gap_mins: gap + DAY_MINS,
            })
        } else {
            None
        }
    }

    /// Connection gap in minutes, normalized to be positive.
    pub fn gap_mins(&self) -> i32 {
        self.gap_mins
    }

    /// The gap rendered as "HH:MM".
    pub fn gap_display(&self) -> String {
        format!("{:02}:{:02}", self.gap_mins / 60, self.gap_mins % 60)
    }

    /// Departure time of the whole itinerary (first leg).
    pub fn departure(&self) -> DayTime {
        self.first.departure
    }

    /// True iff both legs have remaining seats.
    pub fn has_remaining(&self) -> bool {
        self.first.has_remaining() && self.second.has_remaining()
    }
}

impl PartialEq for Transfer {
    fn eq(&self, other: &Self) -> bool {
        self.first == other.first
    }
}

impl Eq for Transfer {}

impl Hash for Transfer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.first.hash(state);
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} + {} (change {})",
            self.first,
            self.second,
            self.gap_display()
        )
    }
}
