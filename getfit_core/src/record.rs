//! Text records exchanged with front ends.
//!
//! Entries and query parameters cross the boundary as flat maps of
//! field name to text. This module parses those strings into typed values
//! and renders typed entries back into text.

use crate::query::{DateRange, QuerySpec, SortKey};
use crate::{EntryDraft, Error, ExerciseCategory, ExerciseSubCategory, LogEntry, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Entry field names in record order, excluding `id`
pub const ENTRY_FIELDS: [&str; 9] = [
    "title",
    "comment",
    "date",
    "duration",
    "feeling",
    "distance",
    "maxHeartRate",
    "exerciseCategory",
    "exerciseSubCategory",
];

/// A log entry as text fields
///
/// Every field is optional on the way in so that a missing key surfaces as
/// a validation error naming that key instead of a generic parse failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feeling: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_heart_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_sub_category: Option<String>,
}

impl EntryRecord {
    /// Parse every field into a draft
    ///
    /// Field contents are checked here only as far as parsing goes; the
    /// remaining invariants are enforced by [`LogEntry::new`].
    pub fn to_draft(&self) -> Result<EntryDraft> {
        let date = required("date", &self.date)?;
        let duration = required("duration", &self.duration)?;

        Ok(EntryDraft {
            title: required("title", &self.title)?.to_string(),
            comment: required("comment", &self.comment)?.to_string(),
            date: date.trim().parse::<NaiveDate>().map_err(|e| {
                Error::validation("date", format!("'{}' is not a YYYY-MM-DD date: {}", date, e))
            })?,
            duration: duration
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| {
                    Error::validation(
                        "duration",
                        format!("'{}' is not a whole number of seconds", duration),
                    )
                })?,
            feeling: number("feeling", &self.feeling)?,
            distance: number("distance", &self.distance)?,
            max_heart_rate: number("maxHeartRate", &self.max_heart_rate)?,
            category: required("exerciseCategory", &self.exercise_category)?.parse()?,
            sub_category: required("exerciseSubCategory", &self.exercise_sub_category)?.parse()?,
        })
    }

    /// The field values in [`ENTRY_FIELDS`] order, empty where unset
    pub fn values(&self) -> [&str; 9] {
        [
            &self.title,
            &self.comment,
            &self.date,
            &self.duration,
            &self.feeling,
            &self.distance,
            &self.max_heart_rate,
            &self.exercise_category,
            &self.exercise_sub_category,
        ]
        .map(|v| v.as_deref().unwrap_or(""))
    }
}

impl From<&LogEntry> for EntryRecord {
    fn from(entry: &LogEntry) -> Self {
        EntryRecord {
            id: Some(entry.id().to_string()),
            title: Some(entry.title().to_string()),
            comment: Some(entry.comment().to_string()),
            date: Some(entry.date().format("%Y-%m-%d").to_string()),
            duration: Some(entry.duration().as_secs().to_string()),
            feeling: Some(entry.feeling().to_string()),
            distance: Some(entry.distance().to_string()),
            max_heart_rate: Some(entry.max_heart_rate().to_string()),
            exercise_category: Some(entry.category().to_string()),
            exercise_sub_category: Some(entry.sub_category().to_string()),
        }
    }
}

fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| Error::validation(field, "missing"))
}

fn number(field: &str, value: &Option<String>) -> Result<f64> {
    let text = required(field, value)?;
    text.trim()
        .parse::<f64>()
        .map_err(|_| Error::validation(field, format!("'{}' is not a number", text)))
}

/// Query parameters as received from a front end
///
/// Blank values count as unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub reverse: Option<String>,
}

impl QueryParams {
    pub fn to_spec(&self) -> Result<QuerySpec> {
        let reverse = match present(&self.reverse) {
            None => false,
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            Some(v) => {
                return Err(Error::validation(
                    "reverse",
                    format!("expected true or false, got '{}'", v),
                ))
            }
        };

        Ok(QuerySpec {
            category: present(&self.category)
                .map(str::parse::<ExerciseCategory>)
                .transpose()?,
            sub_category: present(&self.sub_category)
                .map(str::parse::<ExerciseSubCategory>)
                .transpose()?,
            date_range: present(&self.date).map(DateRange::parse).transpose()?,
            sort: present(&self.sort).map(str::parse::<SortKey>).transpose()?,
            reverse,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EntryRecord {
        EntryRecord {
            id: None,
            title: Some("Example title".into()),
            comment: Some("Example content".into()),
            date: Some("2020-01-01".into()),
            duration: Some("3600".into()),
            feeling: Some("7".into()),
            distance: Some("3.5".into()),
            max_heart_rate: Some("150".into()),
            exercise_category: Some("STRENGTH".into()),
            exercise_sub_category: Some("PULL".into()),
        }
    }

    fn invalid_field(result: Result<EntryDraft>) -> String {
        match result {
            Err(Error::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_record_parses_into_draft() {
        let draft = record().to_draft().unwrap();
        assert_eq!(draft.title, "Example title");
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(draft.duration, Duration::from_secs(3600));
        assert_eq!(draft.feeling, 7.0);
        assert_eq!(draft.distance, 3.5);
        assert_eq!(draft.category, ExerciseCategory::Strength);
        assert_eq!(draft.sub_category, ExerciseSubCategory::Pull);
    }

    #[test]
    fn test_missing_field_is_named() {
        let mut r = record();
        r.max_heart_rate = None;
        assert_eq!(invalid_field(r.to_draft()), "maxHeartRate");
    }

    #[test]
    fn test_unparsable_fields_are_named() {
        let mut r = record();
        r.date = Some("01/01/2020".into());
        assert_eq!(invalid_field(r.to_draft()), "date");

        let mut r = record();
        r.duration = Some("-5".into());
        assert_eq!(invalid_field(r.to_draft()), "duration");

        let mut r = record();
        r.exercise_category = Some("YOGA".into());
        assert_eq!(invalid_field(r.to_draft()), "exerciseCategory");
    }

    #[test]
    fn test_entry_renders_to_record() {
        let entry = LogEntry::new("3", record().to_draft().unwrap()).unwrap();
        let rendered = EntryRecord::from(&entry);

        assert_eq!(rendered.id.as_deref(), Some("3"));
        assert_eq!(rendered.date.as_deref(), Some("2020-01-01"));
        assert_eq!(rendered.duration.as_deref(), Some("3600"));
        assert_eq!(rendered.distance.as_deref(), Some("3.5"));
        assert_eq!(rendered.exercise_sub_category.as_deref(), Some("PULL"));
        assert_eq!(rendered.to_draft().unwrap(), entry.to_draft());
    }

    #[test]
    fn test_record_json_uses_camel_case_keys() {
        let json = serde_json::to_value(record()).unwrap();
        assert!(json.get("maxHeartRate").is_some());
        assert!(json.get("exerciseSubCategory").is_some());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_values_follow_field_order() {
        let r = record();
        let values = r.values();
        assert_eq!(values[0], "Example title");
        assert_eq!(values[ENTRY_FIELDS.len() - 1], "PULL");
    }

    #[test]
    fn test_query_params_to_spec() {
        let params = QueryParams {
            category: Some("strength".into()),
            sub_category: Some("PUSH".into()),
            date: Some("2020-01-03-2020-01-04".into()),
            sort: Some("date".into()),
            reverse: Some("TRUE".into()),
        };
        let spec = params.to_spec().unwrap();

        assert_eq!(spec.category, Some(ExerciseCategory::Strength));
        assert_eq!(spec.sub_category, Some(ExerciseSubCategory::Push));
        assert_eq!(spec.sort, Some(SortKey::Date));
        assert!(spec.reverse);
        assert_eq!(
            spec.date_range.map(|r| r.to_string()),
            Some("2020-01-03-2020-01-04".to_string())
        );
    }

    #[test]
    fn test_blank_query_params_are_unset() {
        let params = QueryParams {
            category: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(params.to_spec().unwrap(), QuerySpec::default());
    }

    #[test]
    fn test_bad_reverse_flag_rejected() {
        let params = QueryParams {
            reverse: Some("sometimes".into()),
            ..Default::default()
        };
        assert!(matches!(
            params.to_spec(),
            Err(Error::Validation { ref field, .. }) if field == "reverse"
        ));
    }
}
