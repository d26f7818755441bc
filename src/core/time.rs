use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::core::errors::MoneyNoteError;
use crate::domain::note::{DATE_FORMAT, TIME_FORMAT};

/// Clock abstracts access to the current timestamp so services remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Wall-clock time of the user. Defaults to the UTC reading.
    fn now_local(&self) -> NaiveDateTime {
        self.now().naive_utc()
    }

    /// Calendar day of the user, derived from `now_local()`.
    fn today(&self) -> NaiveDate {
        self.now_local().date()
    }
}

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A calendar month in `YYYY-MM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first_day: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| Self { first_day })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// The month before this one; January rolls back to December of the previous year.
    pub fn prev(&self) -> Self {
        Self {
            first_day: self
                .first_day
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.first_day),
        }
    }

    /// The month after this one; December rolls over to January of the next year.
    pub fn next(&self) -> Self {
        Self {
            first_day: self
                .first_day
                .checked_add_months(Months::new(1))
                .unwrap_or(self.first_day),
        }
    }

    pub fn days_in_month(&self) -> u32 {
        self.next()
            .first_day
            .signed_duration_since(self.first_day)
            .num_days() as u32
    }

    /// Every calendar day of the month, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day;
        (0..self.days_in_month()).filter_map(move |offset| first.checked_add_days(Days::new(offset as u64)))
    }

    /// Long label such as `May 2024`.
    pub fn label(&self) -> String {
        self.first_day.format("%B %Y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = MoneyNoteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || MoneyNoteError::InvalidInput(format!("`{}` is not a YYYY-MM month", value));
        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

/// Part of the day a note belongs to, derived from its hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeRange {
    Morning,
    Afternoon,
    Evening,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::Morning, TimeRange::Afternoon, TimeRange::Evening];

    /// `[06,12)` is morning, `[12,18)` afternoon, anything else evening.
    pub fn from_hour(hour: Option<u32>) -> Self {
        match hour {
            Some(6..=11) => TimeRange::Morning,
            Some(12..=17) => TimeRange::Afternoon,
            _ => TimeRange::Evening,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Morning => "Morning",
            TimeRange::Afternoon => "Afternoon",
            TimeRange::Evening => "Evening",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, MoneyNoteError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| MoneyNoteError::InvalidInput(format!("`{}` is not a YYYY-MM-DD date", value)))
}

pub fn parse_time(value: &str) -> Result<NaiveTime, MoneyNoteError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| MoneyNoteError::InvalidInput(format!("`{}` is not an HH:MM time", value)))
}

pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(date)
}

pub fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}

/// Long label such as `Wednesday, May 1, 2024`.
pub fn format_day_label(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}
