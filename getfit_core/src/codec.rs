//! JSON persistence for the entry store, with file locking.
//!
//! The saved document is a single JSON object keyed by entry id. Each value
//! is a flat object of text fields, as produced by [`EntryRecord`]:
//!
//! ```json
//! { "0": { "title": "Leg day", "date": "2020-01-01", "duration": "3600", ... } }
//! ```

use crate::record::EntryRecord;
use crate::{catalog, EntryManager, Error, LogEntry, Result};
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Save every entry in the manager to `path`
///
/// Atomically writes the document by:
/// 1. Writing to a locked temp file in the destination directory
/// 2. Syncing to disk
/// 3. Renaming over the destination
pub fn save(manager: &EntryManager, path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let document: BTreeMap<&str, EntryRecord> = manager
        .iter()
        .map(|entry| {
            let record = EntryRecord {
                id: None,
                ..EntryRecord::from(entry)
            };
            (entry.id(), record)
        })
        .collect();

    let temp = NamedTempFile::new_in(parent)?;

    // Serialize concurrent writers
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, &document).map_err(std::io::Error::from)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Saved {} entries to {:?}", document.len(), path);
    Ok(())
}

/// Load a saved document into `manager`, returning the number of entries added
///
/// The whole document is checked before anything is inserted, so on error
/// the manager is left as it was.
pub fn load(manager: &mut EntryManager, path: &Path) -> Result<usize> {
    let bytes = read_locked(path)?;

    let document: BTreeMap<String, EntryRecord> = serde_json::from_slice(&bytes)
        .map_err(|e| Error::MalformedData(format!("{}: {}", path.display(), e)))?;

    let entries = document
        .into_iter()
        .map(|(id, record)| decode_entry(id, &record))
        .collect::<Result<Vec<_>>>()?;

    if let Some(taken) = entries.iter().find(|e| manager.contains(e.id())) {
        return Err(Error::DuplicateId(taken.id().to_string()));
    }

    let count = entries.len();
    for entry in entries {
        manager.add_entry_with_id(entry.id().to_string(), entry.to_draft())?;
    }

    tracing::info!("Loaded {} entries from {:?}", count, path);
    Ok(count)
}

/// Read a file's bytes under a shared lock
fn read_locked(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    file.lock_shared()?;

    let mut bytes = Vec::new();
    let read = BufReader::new(&file).read_to_end(&mut bytes);

    // Dropping the file releases the lock on the error path as well
    file.unlock()?;
    read?;

    Ok(bytes)
}

/// Rebuild one entry from its stored record
///
/// The stored subcategory name is matched against every category's
/// subcategory set rather than only the stored category's.
fn decode_entry(id: String, record: &EntryRecord) -> Result<LogEntry> {
    let stored = record.exercise_sub_category.as_deref().unwrap_or_default();
    let sub_category = catalog::lookup_subcategory(stored).ok_or_else(|| {
        Error::MalformedData(format!("entry {}: unknown subcategory '{}'", id, stored))
    })?;

    let draft = record.to_draft().map_err(|e| malformed(&id, e))?;
    let draft = crate::EntryDraft {
        sub_category,
        ..draft
    };

    LogEntry::new(id.clone(), draft).map_err(|e| malformed(&id, e))
}

fn malformed(id: &str, err: Error) -> Error {
    Error::MalformedData(format!("entry {}: {}", id, err))
}
