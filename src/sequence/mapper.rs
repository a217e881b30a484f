//! Conversion between calendar dates and the publisher's delta-day index.
//!
//! The publisher numbers its daily file sets with a counter that advances by
//! one per business day. Two outages shifted the counter: the first
//! discontinuity inserted one index, the second inserted two, one of which
//! (the hole) was never published.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::{Error, Result};

/// Index of the epoch date.
pub const BASE_INDEX: u32 = 4366;

/// The one index with no published files.
pub const HOLE_INDEX: u32 = 4766;

/// Earliest supported date (a Monday).
const BASE_DATE: NaiveDate = calendar(2019, 5, 6);

/// Discontinuity dates with the number of indices inserted at each, in order.
const DISCONTINUITIES: [(NaiveDate, u32); 2] =
    [(calendar(2020, 2, 1), 1), (calendar(2020, 11, 13), 2)];

/// Publisher-assigned identifier of one business day's file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceIndex(u32);

impl SequenceIndex {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this is the index that was never published.
    pub const fn is_hole(self) -> bool {
        self.0 == HOLE_INDEX
    }
}

impl fmt::Display for SequenceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SequenceIndex {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Build a date constant; an invalid date fails at compile time.
const fn calendar(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar constant"),
    }
}

/// Earliest supported date (a Monday), mapped to [`BASE_INDEX`].
pub fn base_date() -> NaiveDate {
    BASE_DATE
}

/// Discontinuity dates with the number of indices inserted at each.
pub fn discontinuities() -> impl Iterator<Item = (NaiveDate, u32)> {
    DISCONTINUITIES.iter().copied()
}

/// Check whether a date falls on a weekday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Last business day strictly before `date`.
pub fn previous_business_day(date: NaiveDate) -> NaiveDate {
    let mut day = date - Duration::days(1);
    while !is_business_day(day) {
        day = day - Duration::days(1);
    }
    day
}

/// First business day on or after `date`.
pub fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut day = date;
    while !is_business_day(day) {
        day = day + Duration::days(1);
    }
    day
}

/// Convert a calendar date to its sequence index.
///
/// Weekend dates resolve to the preceding Friday's index, so a weekend used as
/// a range boundary behaves like that Friday.
pub fn date_to_index(date: NaiveDate) -> Result<SequenceIndex> {
    let days_passed = (date - base_date()).num_days();
    if days_passed < 0 {
        return Err(Error::Range(format!(
            "{} is before the earliest supported date {}",
            date,
            base_date()
        )));
    }

    let n_weeks = days_passed / 7;
    let rem = days_passed % 7;
    let mut index = i64::from(BASE_INDEX) + days_passed - 2 * n_weeks;
    if rem >= 5 {
        index -= rem - 4;
    }

    // Corrections are cumulative: later dates carry every earlier offset.
    for (since, offset) in discontinuities() {
        if date >= since {
            index += i64::from(offset);
        }
    }

    u32::try_from(index)
        .map(SequenceIndex)
        .map_err(|_| Error::Range(format!("{} has no representable index", date)))
}

/// Convert a sequence index back to the calendar date it was published for.
///
/// Exact inverse of [`date_to_index`] for business days. Indices inserted at a
/// discontinuity resolve to the first non-business day on or after the
/// discontinuity date that no business day claims.
pub fn index_to_date(index: SequenceIndex) -> Result<NaiveDate> {
    let raw = index.get();
    if raw < BASE_INDEX {
        return Err(Error::Range(format!(
            "index {} is below the base index {}",
            raw, BASE_INDEX
        )));
    }
    if index.is_hole() {
        tracing::error!("Accessed sequence hole {}", raw);
        return Err(Error::SequenceHole(raw));
    }

    let mut business_days = raw - BASE_INDEX;
    for (since, offset) in discontinuities() {
        let before = date_to_index(previous_business_day(since))?.get();
        let after = date_to_index(next_business_day(since))?.get();

        if raw > before && raw < after {
            return Ok(inserted_index_date(since, before, raw));
        }
        if raw >= after {
            business_days -= offset;
        }
    }

    let business_days = i64::from(business_days);
    let calendar_days = business_days / 5 * 7 + business_days % 5;
    base_date()
        .checked_add_signed(Duration::days(calendar_days))
        .ok_or_else(|| {
            Error::Range(format!(
                "index {} is past the last representable date",
                raw
            ))
        })
}

/// Date for an index inserted at a discontinuity.
fn inserted_index_date(since: NaiveDate, before: u32, index: u32) -> NaiveDate {
    let position = (before + 1..index).filter(|i| *i != HOLE_INDEX).count();
    since
        .iter_days()
        .filter(|day| !is_business_day(*day))
        .nth(position)
        .unwrap_or(since)
}
