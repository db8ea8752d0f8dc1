//! Command-line surface.
//!
//! Argument parsing plus the relaxed input forms: short dates
//! ("dd", "mm-dd", "yyyy-mm-dd" with `-`, `/` or `\` separators) and
//! lists split on spaces, commas or semicolons (ASCII or full-width).

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::Parser;

use crate::domain::{ClassFilter, InputError, SeatClass, TimeWindow};
use crate::query::{QueryMode, SearchCriteria};

/// Query train schedules between two stations.
#[derive(Debug, Parser)]
#[command(name = "railseek", version, about = "Query remote train schedules")]
pub struct Cli {
    /// Departure station or city
    #[arg(short = 'f', long = "from")]
    pub from: String,

    /// Destination station or city
    #[arg(short = 't', long = "to")]
    pub to: String,

    /// Travel date: dd, mm-dd or yyyy-mm-dd (defaults to today)
    #[arg(short = 'd', long)]
    pub date: Option<String>,

    /// Departure time window, e.g. "06:00-12:00"
    #[arg(long = "from-time")]
    pub from_time: Option<String>,

    /// Arrival time window, e.g. "18:00-24:00"
    #[arg(long = "to-time")]
    pub to_time: Option<String>,

    /// Restrict to these train codes, e.g. "G1 G3 D5"
    #[arg(short = 'n', long = "trains-no")]
    pub trains_no: Option<String>,

    /// Seat classes to show, e.g. "second first standing"
    #[arg(short = 's', long)]
    pub seats: Option<String>,

    /// Also search to intermediate stops of the trains found directly
    #[arg(short = 'z', long = "expand")]
    pub expand: bool,

    /// Transfer station: search two-leg itineraries through it
    #[arg(short = 'c', long = "via")]
    pub via: Option<String>,

    /// Window on the connecting leg's departure, e.g. "08:00-12:00"
    #[arg(long = "change-time")]
    pub change_time: Option<String>,

    /// Longest acceptable connection, in hours
    #[arg(long = "change-interval", default_value_t = 4)]
    pub change_interval: u32,

    /// High-speed services only (G/C/D)
    #[arg(long, conflicts_with = "ktz")]
    pub gcd: bool,

    /// Conventional services only
    #[arg(long)]
    pub ktz: bool,

    /// Only show trains with remaining seats
    #[arg(short = 'r', long)]
    pub remaining: bool,

    /// Match the exact stations instead of their whole city groups
    #[arg(long = "exact-station")]
    pub exact_station: bool,

    /// Station table file (upstream station_name.js format)
    #[arg(long = "stations-file")]
    pub stations_file: Option<PathBuf>,

    /// Debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Build search criteria from the parsed arguments, validating
    /// everything that can be checked before a remote call.
    pub fn criteria(&self, today: NaiveDate) -> Result<SearchCriteria, InputError> {
        if self.gcd && self.ktz {
            return Err(InputError::ConflictingClassFilters);
        }

        let date = parse_date(self.date.as_deref(), today)?;
        let mut criteria = SearchCriteria::new(self.from.clone(), self.to.clone(), date);

        criteria.mode = if self.via.is_some() {
            QueryMode::Transfer
        } else if self.expand {
            QueryMode::Expanded
        } else {
            QueryMode::Direct
        };
        criteria.via = self.via.clone();

        criteria.departure_window = parse_window(self.from_time.as_deref())?;
        criteria.arrival_window = parse_window(self.to_time.as_deref())?;
        criteria.transfer_window = parse_window(self.change_time.as_deref())?;
        criteria.change_interval_mins = (self.change_interval * 60) as i32;

        criteria.allowlist = self.trains_no.as_deref().and_then(|raw| {
            let set: HashSet<String> = split_list(raw).into_iter().collect();
            (!set.is_empty()).then_some(set)
        });

        criteria.class_filter = if self.gcd {
            ClassFilter::HighSpeed
        } else if self.ktz {
            ClassFilter::Conventional
        } else {
            ClassFilter::Any
        };

        criteria.same_city = !self.exact_station;
        criteria.seats_only = self.remaining;
        criteria.seat_classes = parse_seat_classes(self.seats.as_deref())?;

        Ok(criteria)
    }
}

/// Parse a relaxed date string.
///
/// Accepts `yyyy-mm-dd`, `mm-dd` and `dd`, with `-`, `/` or `\` as
/// separators; missing parts default from `today`. `None` or an empty
/// string is today.
pub fn parse_date(input: Option<&str>, today: NaiveDate) -> Result<NaiveDate, InputError> {
    let Some(raw) = input else {
        return Ok(today);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(today);
    }

    let parts: Result<Vec<u32>, _> = raw
        .split(['-', '/', '\\'])
        .filter(|p| !p.is_empty())
        .map(str::parse::<u32>)
        .collect();
    let parts = parts.map_err(|_| InputError::InvalidDate(raw.to_string()))?;

    let (year, month, day) = match parts.as_slice() {
        [y, m, d] => (*y as i32, *m, *d),
        [m, d] => (today.year(), *m, *d),
        [d] => (today.year(), today.month(), *d),
        _ => return Err(InputError::InvalidDate(raw.to_string())),
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| InputError::InvalidDate(raw.to_string()))
}

/// Split a list argument on whitespace, commas or semicolons,
/// full-width included.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split([' ', '\t', ',', ';', '，', '；'])
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_window(raw: Option<&str>) -> Result<Option<TimeWindow>, InputError> {
    raw.map(|s| {
        TimeWindow::parse(s).map_err(|source| InputError::InvalidWindow {
            window: s.to_string(),
            source,
        })
    })
    .transpose()
}

/// Parse the seat-class list; `None` keeps the full column set.
pub fn parse_seat_classes(raw: Option<&str>) -> Result<Vec<SeatClass>, InputError> {
    let Some(raw) = raw else {
        return Ok(SeatClass::ALL.to_vec());
    };

    let classes: Result<Vec<SeatClass>, InputError> = split_list(raw)
        .into_iter()
        .map(|name| SeatClass::parse(&name).ok_or(InputError::UnknownSeatClass(name)))
        .collect();
    let classes = classes?;

    if classes.is_empty() {
        return Ok(SeatClass::ALL.to_vec());
    }
    Ok(classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn date_defaults_to_today() {
        assert_eq!(parse_date(None, today()).unwrap(), today());
        assert_eq!(parse_date(Some(""), today()).unwrap(), today());
    }

    #[test]
    fn date_easy_typing_forms() {
        assert_eq!(parse_date(Some("2026-10-01"), today()).unwrap(), d(2026, 10, 1));
        assert_eq!(parse_date(Some("2026/10/01"), today()).unwrap(), d(2026, 10, 1));
        assert_eq!(parse_date(Some(r"2026\10\01"), today()).unwrap(), d(2026, 10, 1));
        assert_eq!(parse_date(Some("10-01"), today()).unwrap(), d(2026, 10, 1));
        assert_eq!(parse_date(Some("10/01"), today()).unwrap(), d(2026, 10, 1));
        assert_eq!(parse_date(Some("15"), today()).unwrap(), d(2026, 8, 15));
        assert_eq!(parse_date(Some("1"), today()).unwrap(), d(2026, 8, 1));
    }

    #[test]
    fn date_invalid_forms_fail_fast() {
        assert!(parse_date(Some("soon"), today()).is_err());
        assert!(parse_date(Some("2026-13-01"), today()).is_err());
        assert!(parse_date(Some("2026-02-30"), today()).is_err());
        assert!(parse_date(Some("1-2-3-4"), today()).is_err());
    }

    #[test]
    fn list_splitting() {
        assert_eq!(split_list("G1 G3 D5"), vec!["G1", "G3", "D5"]);
        assert_eq!(split_list("G1,G3;D5"), vec!["G1", "G3", "D5"]);
        assert_eq!(split_list("G1，G3；D5"), vec!["G1", "G3", "D5"]);
        assert_eq!(split_list("  G1   G3  "), vec!["G1", "G3"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn seat_class_parsing() {
        let classes = parse_seat_classes(Some("second first")).unwrap();
        assert_eq!(classes, vec![SeatClass::SecondClass, SeatClass::FirstClass]);

        assert_eq!(parse_seat_classes(None).unwrap(), SeatClass::ALL.to_vec());
        assert!(matches!(
            parse_seat_classes(Some("window")),
            Err(InputError::UnknownSeatClass(_))
        ));
    }

    #[test]
    fn criteria_direct_defaults() {
        let cli = Cli::parse_from(["railseek", "-f", "北京", "-t", "上海"]);
        let criteria = cli.criteria(today()).unwrap();

        assert_eq!(criteria.mode, QueryMode::Direct);
        assert_eq!(criteria.date, today());
        assert!(criteria.same_city);
        assert!(!criteria.seats_only);
        assert_eq!(criteria.class_filter, ClassFilter::Any);
        assert!(criteria.allowlist.is_none());
    }

    #[test]
    fn criteria_modes() {
        let cli = Cli::parse_from(["railseek", "-f", "a", "-t", "b", "-z"]);
        assert_eq!(cli.criteria(today()).unwrap().mode, QueryMode::Expanded);

        // A transfer station takes precedence over -z.
        let cli = Cli::parse_from(["railseek", "-f", "a", "-t", "b", "-z", "-c", "南京南"]);
        let criteria = cli.criteria(today()).unwrap();
        assert_eq!(criteria.mode, QueryMode::Transfer);
        assert_eq!(criteria.via.as_deref(), Some("南京南"));
    }

    #[test]
    fn criteria_windows_and_allowlist() {
        let cli = Cli::parse_from([
            "railseek",
            "-f",
            "a",
            "-t",
            "b",
            "--from-time",
            "06:00-12:00",
            "-n",
            "G1,G3",
            "-r",
            "--exact-station",
        ]);
        let criteria = cli.criteria(today()).unwrap();

        assert!(criteria.departure_window.is_some());
        assert!(criteria.seats_only);
        assert!(!criteria.same_city);
        let allow = criteria.allowlist.unwrap();
        assert!(allow.contains("G1") && allow.contains("G3"));
    }

    #[test]
    fn criteria_bad_window_fails_fast() {
        let cli = Cli::parse_from(["railseek", "-f", "a", "-t", "b", "--from-time", "6am-noon"]);
        assert!(matches!(
            cli.criteria(today()),
            Err(InputError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn class_flags_conflict() {
        // clap rejects the combination outright.
        assert!(Cli::try_parse_from(["railseek", "-f", "a", "-t", "b", "--gcd", "--ktz"]).is_err());

        let cli = Cli::parse_from(["railseek", "-f", "a", "-t", "b", "--gcd"]);
        assert_eq!(cli.criteria(today()).unwrap().class_filter, ClassFilter::HighSpeed);

        let cli = Cli::parse_from(["railseek", "-f", "a", "-t", "b", "--ktz"]);
        assert_eq!(
            cli.criteria(today()).unwrap().class_filter,
            ClassFilter::Conventional
        );
    }

    #[test]
    fn change_interval_in_minutes() {
        let cli = Cli::parse_from([
            "railseek",
            "-f",
            "a",
            "-t",
            "b",
            "-c",
            "x",
            "--change-interval",
            "2",
        ]);
        assert_eq!(cli.criteria(today()).unwrap().change_interval_mins, 120);
    }
}
