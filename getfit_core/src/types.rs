//! Core domain types for the exercise log.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise categories and their subcategories
//! - Entry drafts (the caller-supplied fields of a workout)
//! - Log entries (validated, immutable workout records)

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// ============================================================================
// Category Types
// ============================================================================

/// Top-level classification of an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExerciseCategory {
    Strength,
    Running,
    Cycling,
    Swimming,
}

impl ExerciseCategory {
    /// Every category, in declaration order
    pub const ALL: [ExerciseCategory; 4] = [
        ExerciseCategory::Strength,
        ExerciseCategory::Running,
        ExerciseCategory::Cycling,
        ExerciseCategory::Swimming,
    ];

    /// Symbolic name used in records and persisted files
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseCategory::Strength => "STRENGTH",
            ExerciseCategory::Running => "RUNNING",
            ExerciseCategory::Cycling => "CYCLING",
            ExerciseCategory::Swimming => "SWIMMING",
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        ExerciseCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                Error::validation("exerciseCategory", format!("unknown category '{}'", s))
            })
    }
}

/// Second-level classification, only valid within its parent category
///
/// Which category owns which subcategory is defined in [`crate::catalog`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExerciseSubCategory {
    Push,
    Pull,
    Legs,
    Short,
    Long,
    HighIntensity,
    LowIntensity,
}

impl ExerciseSubCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseSubCategory::Push => "PUSH",
            ExerciseSubCategory::Pull => "PULL",
            ExerciseSubCategory::Legs => "LEGS",
            ExerciseSubCategory::Short => "SHORT",
            ExerciseSubCategory::Long => "LONG",
            ExerciseSubCategory::HighIntensity => "HIGHINTENSITY",
            ExerciseSubCategory::LowIntensity => "LOWINTENSITY",
        }
    }
}

impl fmt::Display for ExerciseSubCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseSubCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::catalog::lookup_subcategory(s).ok_or_else(|| {
            Error::validation(
                "exerciseSubCategory",
                format!("unknown subcategory '{}'", s),
            )
        })
    }
}

// ============================================================================
// Entry Types
// ============================================================================

/// The caller-supplied fields of a workout, before an id is attached
#[derive(Clone, Debug, PartialEq)]
pub struct EntryDraft {
    pub title: String,
    pub comment: String,
    pub date: NaiveDate,
    pub duration: Duration,
    pub feeling: f64,
    pub distance: f64,
    pub max_heart_rate: f64,
    pub category: ExerciseCategory,
    pub sub_category: ExerciseSubCategory,
}

/// A validated workout record
///
/// Entries cannot be modified after construction; every field is checked
/// in [`LogEntry::new`].
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    id: String,
    title: String,
    comment: String,
    date: NaiveDate,
    duration: Duration,
    feeling: f64,
    distance: f64,
    max_heart_rate: f64,
    category: ExerciseCategory,
    sub_category: ExerciseSubCategory,
}

impl LogEntry {
    /// Validate a draft and attach an id to it
    pub fn new(id: impl Into<String>, draft: EntryDraft) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::validation("id", "must not be empty"));
        }
        require_text("title", &draft.title)?;
        require_text("comment", &draft.comment)?;
        if draft.duration.subsec_nanos() != 0 {
            return Err(Error::validation(
                "duration",
                format!("{:?} is not a whole number of seconds", draft.duration),
            ));
        }
        require_finite("feeling", draft.feeling)?;
        require_non_negative("distance", draft.distance)?;
        require_non_negative("maxHeartRate", draft.max_heart_rate)?;

        if !crate::catalog::is_member(draft.category, draft.sub_category) {
            return Err(Error::validation(
                "exerciseSubCategory",
                format!(
                    "{} is not a subcategory of {}",
                    draft.sub_category, draft.category
                ),
            ));
        }

        Ok(LogEntry {
            id,
            title: draft.title,
            comment: draft.comment,
            date: draft.date,
            duration: draft.duration,
            feeling: draft.feeling,
            distance: draft.distance,
            max_heart_rate: draft.max_heart_rate,
            category: draft.category,
            sub_category: draft.sub_category,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn feeling(&self) -> f64 {
        self.feeling
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn max_heart_rate(&self) -> f64 {
        self.max_heart_rate
    }

    pub fn category(&self) -> ExerciseCategory {
        self.category
    }

    pub fn sub_category(&self) -> ExerciseSubCategory {
        self.sub_category
    }

    /// Copy the entry's fields back out as a draft
    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            title: self.title.clone(),
            comment: self.comment.clone(),
            date: self.date,
            duration: self.duration,
            feeling: self.feeling,
            distance: self.distance,
            max_heart_rate: self.max_heart_rate,
            category: self.category,
            sub_category: self.sub_category,
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    Ok(())
}

fn require_finite(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::validation(field, format!("{} is not a finite number", value)));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64) -> Result<()> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(Error::validation(field, format!("{} is negative", value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> EntryDraft {
        EntryDraft {
            title: "Morning lift".into(),
            comment: "Felt strong".into(),
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            duration: Duration::from_secs(3600),
            feeling: 7.0,
            distance: 0.0,
            max_heart_rate: 150.0,
            category: ExerciseCategory::Strength,
            sub_category: ExerciseSubCategory::Pull,
        }
    }

    fn invalid_field(result: Result<LogEntry>) -> String {
        match result {
            Err(Error::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_entry_keeps_fields() {
        let entry = LogEntry::new("0", draft()).unwrap();
        assert_eq!(entry.id(), "0");
        assert_eq!(entry.title(), "Morning lift");
        assert_eq!(entry.duration().as_secs(), 3600);
        assert_eq!(entry.category(), ExerciseCategory::Strength);
        assert_eq!(entry.sub_category(), ExerciseSubCategory::Pull);
        assert_eq!(entry.to_draft(), draft());
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut d = draft();
        d.title = "   ".into();
        assert_eq!(invalid_field(LogEntry::new("0", d)), "title");
    }

    #[test]
    fn test_empty_comment_rejected() {
        let mut d = draft();
        d.comment = String::new();
        assert_eq!(invalid_field(LogEntry::new("0", d)), "comment");
    }

    #[test]
    fn test_empty_id_rejected() {
        assert_eq!(invalid_field(LogEntry::new("", draft())), "id");
    }

    #[test]
    fn test_negative_distance_rejected() {
        let mut d = draft();
        d.distance = -1.5;
        assert_eq!(invalid_field(LogEntry::new("0", d)), "distance");
    }

    #[test]
    fn test_fractional_duration_rejected() {
        let mut d = draft();
        d.duration = Duration::from_millis(1500);
        assert_eq!(invalid_field(LogEntry::new("0", d)), "duration");
    }

    #[test]
    fn test_nan_heart_rate_rejected() {
        let mut d = draft();
        d.max_heart_rate = f64::NAN;
        assert_eq!(invalid_field(LogEntry::new("0", d)), "maxHeartRate");
    }

    #[test]
    fn test_subcategory_outside_category_rejected() {
        let mut d = draft();
        d.category = ExerciseCategory::Swimming;
        d.sub_category = ExerciseSubCategory::Push;
        assert_eq!(invalid_field(LogEntry::new("0", d)), "exerciseSubCategory");
    }

    #[test]
    fn test_category_names_parse_case_insensitively() {
        assert_eq!(
            "strength".parse::<ExerciseCategory>().unwrap(),
            ExerciseCategory::Strength
        );
        assert_eq!(
            "HighIntensity".parse::<ExerciseSubCategory>().unwrap(),
            ExerciseSubCategory::HighIntensity
        );
        assert!("yoga".parse::<ExerciseCategory>().is_err());
    }

    #[test]
    fn test_serde_uses_symbolic_names() {
        let json = serde_json::to_string(&ExerciseSubCategory::LowIntensity).unwrap();
        assert_eq!(json, "\"LOWINTENSITY\"");
        assert_eq!(ExerciseCategory::Cycling.to_string(), "CYCLING");
    }
}
