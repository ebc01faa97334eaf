//! In-memory entry store.
//!
//! [`EntryManager`] owns every live [`LogEntry`], keyed by id, and hands out
//! fresh ids for new entries. [`SharedEntryManager`] wraps it in a
//! reader/writer lock for callers on several threads.

use crate::query::{run_query, QuerySpec};
use crate::{EntryDraft, Error, LogEntry, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Keyed collection of log entries
///
/// Iteration order is unspecified and may change whenever the collection
/// is modified. Use [`crate::query::run_query`] with a sort key for a
/// deterministic order.
#[derive(Debug, Default)]
pub struct EntryManager {
    entries: HashMap<String, LogEntry>,
    /// Next counter value to try for a generated id. Never decreases, so a
    /// removed entry's id is not handed out again.
    next_id: u64,
}

impl EntryManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a new entry, returning its generated id
    pub fn add_entry(&mut self, draft: EntryDraft) -> Result<String> {
        let mut candidate = self.next_id;
        while self.entries.contains_key(&candidate.to_string()) {
            candidate = candidate.checked_add(1).ok_or_else(id_space_exhausted)?;
        }

        let id = candidate.to_string();
        let entry = LogEntry::new(id.clone(), draft)?;
        // Stays at u64::MAX once reached; the lookup above then fails cleanly
        self.next_id = candidate.saturating_add(1);
        self.entries.insert(id.clone(), entry);

        tracing::debug!("Added entry {}", id);
        Ok(id)
    }

    /// Validate and store an entry under a caller-supplied id
    ///
    /// Fails with [`Error::DuplicateId`] if the id is taken; the existing
    /// entry is left untouched.
    pub fn add_entry_with_id(&mut self, id: impl Into<String>, draft: EntryDraft) -> Result<()> {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return Err(Error::DuplicateId(id));
        }

        let entry = LogEntry::new(id.clone(), draft)?;

        // Keep generated ids clear of numeric ids supplied from outside
        if let Ok(n) = id.parse::<u64>() {
            if n >= self.next_id {
                self.next_id = n.saturating_add(1);
            }
        }

        self.entries.insert(id.clone(), entry);
        tracing::debug!("Added entry {} with supplied id", id);
        Ok(())
    }

    pub fn get_entry(&self, id: &str) -> Result<&LogEntry> {
        self.entries
            .get(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Remove an entry, returning it
    pub fn remove_entry(&mut self, id: &str) -> Result<LogEntry> {
        let entry = self
            .entries
            .remove(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        tracing::debug!("Removed entry {}", id);
        Ok(entry)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Traverse all entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.values()
    }
}

fn id_space_exhausted() -> Error {
    Error::validation("id", "no numeric id left to generate")
}

impl<'a> IntoIterator for &'a EntryManager {
    type Item = &'a LogEntry;
    type IntoIter = std::collections::hash_map::Values<'a, String, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

/// Thread-safe handle to an [`EntryManager`]
///
/// Mutations take the write lock; reads share the read lock. Reads hand
/// back owned copies so no lock outlives a call.
#[derive(Clone, Debug, Default)]
pub struct SharedEntryManager {
    inner: Arc<RwLock<EntryManager>>,
}

impl SharedEntryManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_manager(manager: EntryManager) -> Self {
        Self {
            inner: Arc::new(RwLock::new(manager)),
        }
    }

    // A panic in another holder leaves the map itself intact, so a
    // poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, EntryManager> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EntryManager> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_entry(&self, draft: EntryDraft) -> Result<String> {
        self.write().add_entry(draft)
    }

    pub fn add_entry_with_id(&self, id: impl Into<String>, draft: EntryDraft) -> Result<()> {
        self.write().add_entry_with_id(id, draft)
    }

    pub fn get_entry(&self, id: &str) -> Result<LogEntry> {
        self.read().get_entry(id).cloned()
    }

    pub fn remove_entry(&self, id: &str) -> Result<LogEntry> {
        self.write().remove_entry(id)
    }

    pub fn entry_count(&self) -> usize {
        self.read().entry_count()
    }

    /// Copy of every entry, in arbitrary order
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.read().iter().cloned().collect()
    }

    /// Run a query against the current entries
    pub fn query(&self, spec: &QuerySpec) -> Vec<LogEntry> {
        run_query(&self.read(), spec).into_iter().cloned().collect()
    }

    /// Persist the current entries
    pub fn save(&self, path: &Path) -> Result<()> {
        crate::codec::save(&self.read(), path)
    }

    /// Restore entries from a saved document, returning how many were added
    pub fn load(&self, path: &Path) -> Result<usize> {
        crate::codec::load(&mut self.write(), path)
    }
}
