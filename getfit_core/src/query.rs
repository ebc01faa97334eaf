//! Query engine for filtered, ordered views of the entry store.
//!
//! A query runs in three steps over a single traversal of the store:
//! - Filter by category, then subcategory, then date range
//! - Stable-sort by the requested key, if any
//! - Reverse, if requested
//!
//! Unset filters match everything, and an empty result is not an error.

use crate::{EntryManager, Error, ExerciseCategory, ExerciseSubCategory, LogEntry, Result};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Inclusive range of calendar dates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// A start later than the end gives a range that contains no dates
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse the `YYYY-MM-DD-YYYY-MM-DD` form
    ///
    /// Both dates contain hyphens themselves, so the string is split at a
    /// fixed position: two 10-character dates around the hyphen at index 10.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || {
            Error::validation(
                "date",
                format!("expected YYYY-MM-DD-YYYY-MM-DD, got '{}'", s),
            )
        };

        if s.len() != 21 || s.as_bytes()[10] != b'-' {
            return Err(invalid());
        }

        let start = s
            .get(..10)
            .and_then(|p| p.parse::<NaiveDate>().ok())
            .ok_or_else(invalid)?;
        let end = s
            .get(11..)
            .and_then(|p| p.parse::<NaiveDate>().ok())
            .ok_or_else(invalid)?;

        Ok(Self::new(start, end))
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl FromStr for DateRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Field to order query results by
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Title,
    Duration,
    Feeling,
    Distance,
    MaxHeartRate,
}

impl SortKey {
    const ALL: [SortKey; 6] = [
        SortKey::Date,
        SortKey::Title,
        SortKey::Duration,
        SortKey::Feeling,
        SortKey::Distance,
        SortKey::MaxHeartRate,
    ];

    /// Name as used in query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Title => "title",
            SortKey::Duration => "duration",
            SortKey::Feeling => "feeling",
            SortKey::Distance => "distance",
            SortKey::MaxHeartRate => "maxHeartRate",
        }
    }

    /// Ascending comparison of two entries on this key
    pub fn compare(&self, a: &LogEntry, b: &LogEntry) -> Ordering {
        match self {
            SortKey::Date => a.date().cmp(&b.date()),
            SortKey::Title => a.title().cmp(b.title()),
            SortKey::Duration => a.duration().cmp(&b.duration()),
            SortKey::Feeling => a.feeling().total_cmp(&b.feeling()),
            SortKey::Distance => a.distance().total_cmp(&b.distance()),
            SortKey::MaxHeartRate => a.max_heart_rate().total_cmp(&b.max_heart_rate()),
        }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::validation("sort", format!("cannot sort by '{}'", s)))
    }
}

/// Filters and ordering for a query; the default matches everything
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuerySpec {
    pub category: Option<ExerciseCategory>,
    pub sub_category: Option<ExerciseSubCategory>,
    pub date_range: Option<DateRange>,
    pub sort: Option<SortKey>,
    pub reverse: bool,
}

impl QuerySpec {
    /// Check an entry against every filter that is set
    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.category.map_or(true, |c| entry.category() == c)
            && self.sub_category.map_or(true, |s| entry.sub_category() == s)
            && self.date_range.map_or(true, |r| r.contains(entry.date()))
    }
}

/// Run a query, returning matching entries in query order
pub fn run_query<'a>(manager: &'a EntryManager, spec: &QuerySpec) -> Vec<&'a LogEntry> {
    let mut results: Vec<&LogEntry> = manager.iter().collect();
    let total = results.len();

    results.retain(|e| spec.matches(e));

    if let Some(key) = spec.sort {
        // sort_by is stable: equal keys keep their traversal order
        results.sort_by(|a, b| key.compare(a, b));
    }

    if spec.reverse {
        results.reverse();
    }

    tracing::debug!("Query matched {} of {} entries", results.len(), total);
    results
}
