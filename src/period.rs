//! Resolving report periods (a week, month or year) relative to a reference date.

use std::str::FromStr;

use time::{Date, Duration, Month, util};

use crate::Error;

/// The length of a report period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// A week starting on Monday.
    Week,
    /// A calendar month.
    Month,
    /// A calendar year.
    Year,
}

impl Granularity {
    /// The lowercase name used in URLs and short period strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(Error::InvalidPeriod(other.to_owned())),
        }
    }
}

/// An inclusive date range with a human readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    /// The first day of the period.
    pub start_time: Date,
    /// The last day of the period.
    pub end_time: Date,
    /// E.g. "Week beginning September 4, 2017", "September 2017" or "2017".
    pub description: String,
}

/// Get the period of length `granularity` that is `offset` periods before
/// the one containing `now`.
///
/// An `offset` of zero gives the period containing `now`. Offsets that reach
/// past the earliest representable date are clamped to it.
pub fn resolve_period(now: Date, granularity: Granularity, offset: u32) -> Period {
    let period = match granularity {
        Granularity::Week => week_period(now, offset),
        Granularity::Month => month_period(now, offset),
        Granularity::Year => year_period(now, offset),
    };

    tracing::debug!(
        "resolved {} period {offset} before {now} to {} - {}",
        granularity.as_str(),
        period.start_time,
        period.end_time
    );

    period
}

fn week_period(now: Date, offset: u32) -> Period {
    let days_since_monday = Duration::days(now.weekday().number_days_from_monday() as i64);
    let start_time = now
        .checked_sub(days_since_monday + Duration::weeks(offset as i64))
        .unwrap_or(Date::MIN);
    let end_time = start_time.saturating_add(Duration::days(6));

    let description = format!(
        "Week beginning {} {}, {}",
        start_time.month(),
        start_time.day(),
        start_time.year()
    );

    Period {
        start_time,
        end_time,
        description,
    }
}

fn month_period(now: Date, offset: u32) -> Period {
    let months_since_epoch =
        now.year() as i64 * 12 + (u8::from(now.month()) as i64 - 1) - offset as i64;
    let year = clamp_year(months_since_epoch.div_euclid(12));
    let month = month_from_index(months_since_epoch.rem_euclid(12) as u8);

    let start_time = date_or_min(year, month, 1);
    let end_time = date_or_min(year, month, util::days_in_month(month, year));

    let description = format!("{month} {year}");

    Period {
        start_time,
        end_time,
        description,
    }
}

fn year_period(now: Date, offset: u32) -> Period {
    let year = clamp_year(now.year() as i64 - offset as i64);

    Period {
        start_time: date_or_min(year, Month::January, 1),
        end_time: date_or_min(year, Month::December, 31),
        description: year.to_string(),
    }
}

/// Parse a short period string such as "month3" or "year1" into its
/// granularity and length.
///
/// Strings that do not match, e.g. "decade2" or "month", fall back to five
/// years rather than being reported.
pub fn parse_short_period(short_period: &str) -> (Granularity, u32) {
    let name_end = short_period
        .find(|c: char| !c.is_ascii_lowercase())
        .unwrap_or(short_period.len());
    let (name, length) = short_period.split_at(name_end);

    let is_numeric = !length.is_empty() && length.chars().all(|c| c.is_ascii_digit());

    let parsed = match (name.parse::<Granularity>(), length.parse::<u32>()) {
        (Ok(granularity), Ok(length)) if is_numeric => Some((granularity, length)),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        tracing::warn!("could not parse period \"{short_period}\", falling back to five years");
        (Granularity::Year, 5)
    })
}

/// Map a zero-based month index to a [Month], wrapping around after December.
pub(crate) fn month_from_index(index: u8) -> Month {
    Month::January.nth_next(index % 12)
}

fn clamp_year(year: i64) -> i32 {
    year.clamp(Date::MIN.year() as i64, Date::MAX.year() as i64) as i32
}

fn date_or_min(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).unwrap_or(Date::MIN)
}
