//! Birth dates at the boundary of the engine, plus UTC clock helpers.
//!
//! Parsing and calendar validation live here so the builder itself can stay
//! total: it accepts any [`BirthDate`] and never fails.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::MIN_BIRTH_YEAR;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})$").unwrap());
static DOTTED_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2})\.([0-9]{1,2})\.([0-9]{4})$").unwrap());

/// A calendar date split into its components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BirthDate {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DateError {
    Format(String),
    Month(u32),
    Day { year: u32, month: u32, day: u32 },
    YearTooEarly(u32),
    NotInPast(BirthDate),
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::Format(s) => {
                write!(f, "unrecognized date '{s}' (expected YYYY-MM-DD or DD.MM.YYYY)")
            }
            DateError::Month(m) => write!(f, "month {m} is not in 1..=12"),
            DateError::Day { year, month, day } => {
                write!(f, "day {day} does not exist in {year:04}-{month:02}")
            }
            DateError::YearTooEarly(y) => {
                write!(f, "year {y} must be later than {MIN_BIRTH_YEAR}")
            }
            DateError::NotInPast(d) => write!(f, "date {d} is not in the past"),
        }
    }
}

impl std::error::Error for DateError {}

impl BirthDate {
    pub fn new(year: u32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Parse `YYYY-MM-DD` or `DD.MM.YYYY` without calendar checks.
    pub fn parse(input: &str) -> Result<Self, DateError> {
        let s = input.trim();
        let format_err = || DateError::Format(s.to_string());
        let [year, month, day] = date_fields(s).ok_or_else(format_err)?;
        let num = |field: &str| field.parse::<u32>().map_err(|_| format_err());
        Ok(Self::new(num(year)?, num(month)?, num(day)?))
    }

    /// Parse user input and validate it. Bare `DDMMYYYY` digits are run
    /// through [`normalize_input`] first; anything else goes to
    /// [`BirthDate::parse_validated`] as typed.
    pub fn parse_input(input: &str) -> Result<Self, DateError> {
        let trimmed = input.trim();
        if trimmed.len() == 8 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Self::parse_validated(&normalize_input(trimmed));
        }
        Self::parse_validated(trimmed)
    }

    /// Parse and validate against today's UTC date.
    pub fn parse_validated(input: &str) -> Result<Self, DateError> {
        let date = Self::parse(input)?;
        date.validate(today_utc())?;
        Ok(date)
    }

    /// Calendar sanity: real month/day, year after 1900, strictly before `today`.
    pub fn validate(&self, today: BirthDate) -> Result<(), DateError> {
        if !(1..=12).contains(&self.month) {
            return Err(DateError::Month(self.month));
        }
        if self.day == 0 || self.day > days_in_month(self.year, self.month) {
            return Err(DateError::Day {
                year: self.year,
                month: self.month,
                day: self.day,
            });
        }
        if self.year <= MIN_BIRTH_YEAR {
            return Err(DateError::YearTooEarly(self.year));
        }
        if *self >= today {
            return Err(DateError::NotInPast(*self));
        }
        Ok(())
    }

    pub fn to_iso(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    pub fn to_display(&self) -> String {
        format!("{:02}.{:02}.{:04}", self.day, self.month, self.year)
    }
}

impl Ord for BirthDate {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month, self.day).cmp(&(other.year, other.month, other.day))
    }
}

impl PartialOrd for BirthDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

pub fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// `[year, month, day]` text of an ISO or dotted date.
fn date_fields(s: &str) -> Option<[&str; 3]> {
    let (caps, order) = match ISO_DATE.captures(s) {
        Some(caps) => (caps, [1, 2, 3]),
        None => (DOTTED_DATE.captures(s)?, [3, 2, 1]),
    };
    let field = |i: usize| caps.get(i).map(|m| m.as_str());
    Some([field(order[0])?, field(order[1])?, field(order[2])?])
}

/// Mirror of the dotted input mask: keep digits only, cap at eight, and
/// insert dots after the day and month.
///
/// `"01061926"` → `"01.06.1926"`, `"0106"` → `"01.06"`.
pub fn normalize_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).take(8).collect();
    let mut out = String::with_capacity(10);
    for (i, c) in digits.chars().enumerate() {
        if i == 2 || i == 4 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

// --- UTC clock ---

const SECS_PER_DAY: u64 = 86_400;

/// Seconds since the Unix epoch. A clock set before 1970 reads as zero.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// `created_at` / `exported_at` stamp, e.g. `2026-10-18T09:30:00Z`.
pub fn now_iso8601() -> String {
    unix_to_iso8601(now_unix_secs())
}

/// The reference date for "strictly in the past".
pub fn today_utc() -> BirthDate {
    date_after_epoch(now_unix_secs() / SECS_PER_DAY)
}

pub fn unix_to_iso8601(secs: u64) -> String {
    let date = date_after_epoch(secs / SECS_PER_DAY);
    let clock = secs % SECS_PER_DAY;
    format!(
        "{}T{:02}:{:02}:{:02}Z",
        date.to_iso(),
        clock / 3600,
        clock / 60 % 60,
        clock % 60
    )
}

/// Walk whole years, then whole months, from 1970-01-01.
fn date_after_epoch(mut days: u64) -> BirthDate {
    let mut year = 1970;
    loop {
        let year_len = if is_leap_year(year) { 366 } else { 365 };
        if days < year_len {
            break;
        }
        days -= year_len;
        year += 1;
    }
    let mut month = 1;
    loop {
        let month_len = u64::from(days_in_month(year, month));
        if days < month_len {
            break;
        }
        days -= month_len;
        month += 1;
    }
    // Under 31 here.
    BirthDate::new(year, month, days as u32 + 1)
}
