use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date, Duration, Weekday};

use crate::error::{AppError, AppResult};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Day of the week a meal is planned for, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown day token: {0}")]
pub struct UnknownDay(pub String);

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Sun,
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Sun => "Sun",
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
        }
    }

    /// 0 for Sunday through 6 for Saturday.
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_weekday(weekday: Weekday) -> Self {
        Day::ALL[weekday.number_days_from_sunday() as usize]
    }

    /// Matches canonical three-letter tokens only.
    pub fn parse(token: &str) -> Option<Self> {
        Day::ALL.into_iter().find(|d| d.as_str() == token)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = UnknownDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::parse(s).ok_or_else(|| UnknownDay(s.to_string()))
    }
}

pub fn day_to_string(date: Date) -> Day {
    Day::from_weekday(date.weekday())
}

/// Resolves a day token to its next occurrence after `today`.
///
/// A token naming today's weekday resolves one week ahead. Unknown tokens
/// resolve to `today`.
pub fn parse_day_to_date(token: &str, today: Date) -> Date {
    let Some(target) = Day::parse(token) else {
        return today;
    };
    let mut offset = i64::from(target.index()) - i64::from(day_to_string(today).index());
    if offset <= 0 {
        offset += 7;
    }
    today.checked_add(Duration::days(offset)).unwrap_or(today)
}

/// The Sunday on or before `date`.
pub fn week_start(date: Date) -> Date {
    let back = i64::from(date.weekday().number_days_from_sunday());
    date.checked_sub(Duration::days(back)).unwrap_or(date)
}

pub fn parse_date(raw: &str) -> AppResult<Date> {
    Date::parse(raw.trim(), DATE_FORMAT)
        .map_err(|_| AppError::Validation(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}
