//! Calendar and index ranges of a download job.

use std::fmt;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::sequence::mapper::{
    date_to_index, index_to_date, SequenceIndex, BASE_INDEX, HOLE_INDEX,
};

/// Closed calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "from {} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Closed range of sequence indices `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub lo: SequenceIndex,
    pub hi: SequenceIndex,
}

impl IndexRange {
    pub fn new(lo: SequenceIndex, hi: SequenceIndex) -> Result<Self> {
        if lo > hi {
            return Err(Error::Range(format!(
                "index range is empty ({} > {})",
                lo, hi
            )));
        }
        Ok(Self { lo, hi })
    }

    /// Index range covering a calendar range.
    pub fn from_dates(dates: &DateRange) -> Result<Self> {
        Self::new(date_to_index(dates.start)?, date_to_index(dates.end)?)
    }

    pub fn contains(&self, index: SequenceIndex) -> bool {
        self.lo <= index && index <= self.hi
    }

    pub fn contains_hole(&self) -> bool {
        self.contains(SequenceIndex::new(HOLE_INDEX))
    }

    /// Number of published days in the range.
    pub fn day_count(&self) -> u32 {
        let span = self.hi.get() - self.lo.get() + 1;
        if self.contains_hole() {
            span - 1
        } else {
            span
        }
    }

    /// Published indices in ascending order; the hole is never yielded.
    pub fn published(&self) -> impl Iterator<Item = SequenceIndex> {
        (self.lo.get()..=self.hi.get())
            .filter(|i| *i != HOLE_INDEX)
            .map(SequenceIndex::new)
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// A calendar range together with its index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub dates: DateRange,
    pub indices: IndexRange,
}

impl ResolvedRange {
    /// Resolve an explicit calendar range.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let dates = DateRange { start, end };
        let indices = IndexRange::from_dates(&dates)?;
        Ok(Self { dates, indices })
    }

    /// Resolve the last `n` published days ending at `yesterday`.
    ///
    /// The window is widened by one index when it spans the hole so that it
    /// still covers `n` published days.
    pub fn latest(n: u32, yesterday: NaiveDate) -> Result<Self> {
        if n == 0 {
            return Err(Error::Range("at least one day is required".into()));
        }

        let hi = date_to_index(yesterday)?;
        let lo = (hi.get() + 1)
            .checked_sub(n)
            .filter(|lo| *lo >= BASE_INDEX)
            .ok_or_else(|| {
                Error::Range(format!(
                    "{} days before {} reach past the earliest supported date",
                    n, yesterday
                ))
            })?;

        let mut indices = IndexRange::new(SequenceIndex::new(lo), hi)?;
        if indices.contains_hole() {
            let widened = lo.checked_sub(1).filter(|lo| *lo >= BASE_INDEX).ok_or_else(|| {
                Error::Range(format!("cannot cover {} days before {}", n, yesterday))
            })?;
            indices.lo = SequenceIndex::new(widened);
        }

        let dates = DateRange {
            start: index_to_date(indices.lo)?,
            end: yesterday,
        };
        Ok(Self { dates, indices })
    }
}
