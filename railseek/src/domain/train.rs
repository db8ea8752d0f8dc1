//! Scheduled train leg.
//!
//! A `Train` is one scheduled run between two stations on the query
//! date, as reported by the schedule-search endpoint. Display names
//! are resolved from station codes when the record is built; records
//! are immutable afterwards.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::time::DayTime;

/// Remaining-seat marker for one seat class.
///
/// The upstream row reports a count ("3"), a token ("有"), a sold-out
/// marker ("无") or nothing for classes the train does not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatCount {
    /// Seats remain; carries the upstream text (a number or "有").
    Available(String),
    /// "无" - this class exists on the train but is sold out.
    SoldOut,
    /// "--" or empty - this class does not apply to the train.
    NotApplicable,
}

impl SeatCount {
    /// Parse an upstream seat field.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" | "--" => SeatCount::NotApplicable,
            "无" => SeatCount::SoldOut,
            other => SeatCount::Available(other.to_string()),
        }
    }

    /// True iff this marker indicates remaining seats.
    pub fn is_available(&self) -> bool {
        matches!(self, SeatCount::Available(_))
    }

    /// Display text for the table sink.
    pub fn label(&self) -> &str {
        match self {
            SeatCount::Available(s) => s,
            SeatCount::SoldOut => "无",
            SeatCount::NotApplicable => "--",
        }
    }
}

/// Seat classes and their fixed field positions in the upstream row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatClass {
    Business,
    FirstClass,
    SecondClass,
    PremiumSoftSleeper,
    SoftSleeper,
    EmuSleeper,
    HardSleeper,
    SoftSeat,
    HardSeat,
    Standing,
}

impl SeatClass {
    /// The full column set in display order.
    pub const ALL: [SeatClass; 10] = [
        SeatClass::Business,
        SeatClass::FirstClass,
        SeatClass::SecondClass,
        SeatClass::PremiumSoftSleeper,
        SeatClass::SoftSleeper,
        SeatClass::EmuSleeper,
        SeatClass::HardSleeper,
        SeatClass::SoftSeat,
        SeatClass::HardSeat,
        SeatClass::Standing,
    ];

    /// Field index of this class in the pipe-delimited schedule row.
    pub fn field_index(&self) -> usize {
        match self {
            SeatClass::Business => 32,
            SeatClass::FirstClass => 31,
            SeatClass::SecondClass => 30,
            SeatClass::PremiumSoftSleeper => 21,
            SeatClass::SoftSleeper => 23,
            SeatClass::EmuSleeper => 33,
            SeatClass::HardSleeper => 28,
            SeatClass::SoftSeat => 24,
            SeatClass::HardSeat => 29,
            SeatClass::Standing => 26,
        }
    }

    /// Short column label for the table sink.
    pub fn label(&self) -> &'static str {
        match self {
            SeatClass::Business => "business",
            SeatClass::FirstClass => "1st",
            SeatClass::SecondClass => "2nd",
            SeatClass::PremiumSoftSleeper => "premium sleeper",
            SeatClass::SoftSleeper => "soft sleeper",
            SeatClass::EmuSleeper => "emu sleeper",
            SeatClass::HardSleeper => "hard sleeper",
            SeatClass::SoftSeat => "soft seat",
            SeatClass::HardSeat => "hard seat",
            SeatClass::Standing => "standing",
        }
    }

    /// Parse a class name as given on the command line.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "business" => Some(SeatClass::Business),
            "first" | "1st" => Some(SeatClass::FirstClass),
            "second" | "2nd" => Some(SeatClass::SecondClass),
            "premium-sleeper" => Some(SeatClass::PremiumSoftSleeper),
            "soft-sleeper" => Some(SeatClass::SoftSleeper),
            "emu-sleeper" => Some(SeatClass::EmuSleeper),
            "hard-sleeper" => Some(SeatClass::HardSleeper),
            "soft-seat" => Some(SeatClass::SoftSeat),
            "hard-seat" => Some(SeatClass::HardSeat),
            "standing" | "no-seat" => Some(SeatClass::Standing),
            _ => None,
        }
    }
}

/// Train class derived from the display-code prefix.
///
/// Purely a presentation tag; G/C/D services are high-speed, all other
/// prefixes (K, T, Z, numeric, ...) are conventional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainClass {
    HighSpeed,
    Conventional,
}

impl TrainClass {
    /// Classify a display code such as "G101" or "K528".
    pub fn of(no: &str) -> Self {
        match no.as_bytes().first() {
            Some(b'G' | b'C' | b'D') => TrainClass::HighSpeed,
            _ => TrainClass::Conventional,
        }
    }
}

/// Train-class inclusion filter. The two restricted variants are
/// mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassFilter {
    #[default]
    Any,
    /// G/C/D services only.
    HighSpeed,
    /// Everything except G/C/D.
    Conventional,
}

impl ClassFilter {
    /// True iff a train with this display code passes the filter.
    pub fn admits(&self, no: &str) -> bool {
        match self {
            ClassFilter::Any => true,
            ClassFilter::HighSpeed => TrainClass::of(no) == TrainClass::HighSpeed,
            ClassFilter::Conventional => TrainClass::of(no) == TrainClass::Conventional,
        }
    }
}

/// One scheduled train leg.
///
/// # Invariants
///
/// - `from_name`/`to_name` are derived from the codes by the station
///   index at construction and never set independently.
/// - Equality and hashing use `(full_no, from_name, to_name)` only, so
///   the same physical leg reached through different station-code
///   aliases collapses to one entity. Seat counts and the display code
///   do not participate.
/// - There is deliberately no `Ord` impl: result ordering is by
///   departure time, which is unrelated to equality. Sorting goes
///   through `sort_by_key(|t| t.departure)`.
#[derive(Debug, Clone)]
pub struct Train {
    /// Opaque route identifier, globally unique per physical run.
    pub full_no: String,
    /// Short display code, e.g. "G101".
    pub no: String,
    pub from_code: String,
    pub to_code: String,
    pub from_name: String,
    pub to_name: String,
    pub departure: DayTime,
    pub arrival: DayTime,
    /// Elapsed duration as reported upstream ("05:32").
    pub duration: String,
    /// Seat markers in the order of the requested seat classes.
    pub seats: Vec<SeatCount>,
}

impl Train {
    /// True iff at least one seat class has remaining seats.
    pub fn has_remaining(&self) -> bool {
        self.seats.iter().any(SeatCount::is_available)
    }

    /// Presentation class of this train.
    pub fn class(&self) -> TrainClass {
        TrainClass::of(&self.no)
    }
}

impl PartialEq for Train {
    fn eq(&self, other: &Self) -> bool {
        self.full_no == other.full_no
            && self.from_name == other.from_name
            && self.to_name == other.to_name
    }
}

impl Eq for Train {}

impl Hash for Train {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_no.hash(state);
        self.from_name.hash(state);
        self.to_name.hash(state);
    }
}

impl fmt::Display for Train {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} -> {} {} ({})",
            self.no, self.departure, self.from_name, self.to_name, self.arrival, self.duration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn t(s: &str) -> DayTime {
        DayTime::parse(s).unwrap()
    }

    pub(crate) fn make_train(full_no: &str, no: &str, from: &str, to: &str, dep: &str) -> Train {
        Train {
            full_no: full_no.to_string(),
            no: no.to_string(),
            from_code: String::new(),
            to_code: String::new(),
            from_name: from.to_string(),
            to_name: to.to_string(),
            departure: t(dep),
            arrival: t("12:00"),
            duration: "03:00".to_string(),
            seats: vec![SeatCount::Available("有".into())],
        }
    }

    #[test]
    fn seat_count_parse() {
        assert_eq!(SeatCount::parse(""), SeatCount::NotApplicable);
        assert_eq!(SeatCount::parse("--"), SeatCount::NotApplicable);
        assert_eq!(SeatCount::parse("无"), SeatCount::SoldOut);
        assert_eq!(SeatCount::parse("有"), SeatCount::Available("有".into()));
        assert_eq!(SeatCount::parse("15"), SeatCount::Available("15".into()));
    }

    #[test]
    fn has_remaining_any_available() {
        let mut train = make_train("24000000G101", "G101", "北京南", "上海虹桥", "09:00");
        train.seats = vec![SeatCount::SoldOut, SeatCount::NotApplicable];
        assert!(!train.has_remaining());

        train.seats.push(SeatCount::Available("3".into()));
        assert!(train.has_remaining());
    }

    #[test]
    fn has_remaining_empty_seat_list() {
        let mut train = make_train("24000000G101", "G101", "北京南", "上海虹桥", "09:00");
        train.seats.clear();
        assert!(!train.has_remaining());
    }

    #[test]
    fn class_prefixes() {
        assert_eq!(TrainClass::of("G101"), TrainClass::HighSpeed);
        assert_eq!(TrainClass::of("C2205"), TrainClass::HighSpeed);
        assert_eq!(TrainClass::of("D311"), TrainClass::HighSpeed);
        assert_eq!(TrainClass::of("K528"), TrainClass::Conventional);
        assert_eq!(TrainClass::of("Z98"), TrainClass::Conventional);
        assert_eq!(TrainClass::of("1462"), TrainClass::Conventional);
    }

    #[test]
    fn class_filter_admits() {
        assert!(ClassFilter::Any.admits("G101"));
        assert!(ClassFilter::Any.admits("K528"));
        assert!(ClassFilter::HighSpeed.admits("D311"));
        assert!(!ClassFilter::HighSpeed.admits("K528"));
        assert!(ClassFilter::Conventional.admits("K528"));
        assert!(!ClassFilter::Conventional.admits("G101"));
    }

    #[test]
    fn equality_ignores_seats_and_display_code() {
        let a = make_train("24000000G101", "G101", "北京南", "上海虹桥", "09:00");
        let mut b = make_train("24000000G101", "G10", "北京南", "上海虹桥", "10:30");
        b.seats = vec![SeatCount::SoldOut];
        assert_eq!(a, b);

        let c = make_train("24000000G103", "G101", "北京南", "上海虹桥", "09:00");
        assert_ne!(a, c);

        let d = make_train("24000000G101", "G101", "北京西", "上海虹桥", "09:00");
        assert_ne!(a, d);
    }

    #[test]
    fn hash_consistent_with_eq() {
        let a = make_train("24000000G101", "G101", "北京南", "上海虹桥", "09:00");
        let b = make_train("24000000G101", "G101", "北京南", "上海虹桥", "11:00");

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn seat_class_field_indices() {
        assert_eq!(SeatClass::Business.field_index(), 32);
        assert_eq!(SeatClass::SecondClass.field_index(), 30);
        assert_eq!(SeatClass::HardSeat.field_index(), 29);
        assert_eq!(SeatClass::Standing.field_index(), 26);
    }

    #[test]
    fn seat_class_names() {
        assert_eq!(SeatClass::parse("second"), Some(SeatClass::SecondClass));
        assert_eq!(SeatClass::parse("2ND"), Some(SeatClass::SecondClass));
        assert_eq!(SeatClass::parse("hard-sleeper"), Some(SeatClass::HardSleeper));
        assert_eq!(SeatClass::parse("window"), None);
    }
}
