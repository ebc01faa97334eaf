//! CSV export of query results.

use crate::record::{EntryRecord, ENTRY_FIELDS};
use crate::{LogEntry, Result};
use std::fs::File;
use std::path::Path;

/// Write entries to a CSV file, in the order given
///
/// The file is replaced if it exists. Columns are `id` followed by the
/// record fields, with values rendered exactly as in saved documents.
/// Returns the number of rows written.
pub fn export_csv<'a, I>(entries: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer.write_record(std::iter::once("id").chain(ENTRY_FIELDS))?;

    let mut count = 0;
    for entry in entries {
        let record = EntryRecord::from(entry);
        writer.write_record(std::iter::once(entry.id()).chain(record.values()))?;
        count += 1;
    }

    // Flush and sync to disk
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} entries to {:?}", count, path);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{run_query, QuerySpec, SortKey};
    use crate::{EntryDraft, EntryManager, ExerciseCategory, ExerciseSubCategory};
    use chrono::NaiveDate;
    use std::time::Duration;

    fn manager() -> EntryManager {
        let mut manager = EntryManager::new();
        for (title, day) in [("Second", 2), ("First, with comma", 1)] {
            manager
                .add_entry(EntryDraft {
                    title: title.into(),
                    comment: "ok".into(),
                    date: NaiveDate::from_ymd_opt(2021, 3, day).unwrap(),
                    duration: Duration::from_secs(1800),
                    feeling: 8.0,
                    distance: 5.25,
                    max_heart_rate: 171.0,
                    category: ExerciseCategory::Cycling,
                    sub_category: ExerciseSubCategory::Short,
                })
                .unwrap();
        }
        manager
    }

    #[test]
    fn test_export_writes_header_and_rows_in_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out").join("entries.csv");

        let manager = manager();
        let spec = QuerySpec {
            sort: Some(SortKey::Date),
            ..Default::default()
        };
        let count = export_csv(run_query(&manager, &spec), &path).unwrap();
        assert_eq!(count, 2);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "id");
        assert_eq!(&headers[7], "maxHeartRate");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "First, with comma");
        assert_eq!(&rows[0][3], "2021-03-01");
        assert_eq!(&rows[1][1], "Second");
        assert_eq!(&rows[1][6], "5.25");
    }

    #[test]
    fn test_export_replaces_existing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("entries.csv");
        std::fs::write(&path, "stale\nstale\nstale\nstale\n").unwrap();

        let count = export_csv(std::iter::empty(), &path).unwrap();
        assert_eq!(count, 0);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("stale"));
        assert_eq!(contents.lines().count(), 1);
    }
}
