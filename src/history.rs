//! Draw history
//!
//! Newest-first, capped log of wheel results. Persisted as a whole JSON
//! array after every change. Storage is best-effort: read failures start an
//! empty log, write failures are logged and the in-memory log stays
//! authoritative for the session.

use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::consts::{HISTORY_CAPACITY, HISTORY_STORAGE_KEY};
use crate::error::StorageError;
use crate::platform::Storage;

/// A single recorded draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Landed option value
    pub result: String,
    /// Local wall-clock time, `HH:MM:SS`
    #[serde(rename = "time")]
    pub display_time: String,
    /// RFC 3339 UTC timestamp with milliseconds
    #[serde(rename = "date")]
    pub iso_timestamp: String,
}

impl HistoryEntry {
    pub fn at<Tz>(result: impl Into<String>, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            result: result.into(),
            display_time: now.format("%H:%M:%S").to_string(),
            iso_timestamp: now
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// One rendered history line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub result: String,
    pub time: String,
}

/// What the display surface should show for the history panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    /// No draws yet
    Empty { placeholder: String },
    /// Newest first
    Rows(Vec<HistoryRow>),
}

/// Persisted, capped draw log
#[derive(Debug)]
pub struct HistoryLog<S> {
    entries: Vec<HistoryEntry>,
    capacity: usize,
    key: String,
    storage: S,
}

impl<S: Storage> HistoryLog<S> {
    /// Load from the default key with the default capacity
    pub fn load(storage: S) -> Self {
        Self::load_with(storage, HISTORY_STORAGE_KEY, HISTORY_CAPACITY)
    }

    /// Load the persisted log. Never fails: absent, unreadable or corrupt
    /// data all yield an empty log.
    pub fn load_with(storage: S, key: &str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = match read_entries(&storage, key) {
            Ok(Some(entries)) => {
                log::info!("Loaded {} history entries", entries.len());
                entries
            }
            Ok(None) => {
                log::info!("No history found, starting fresh");
                Vec::new()
            }
            Err(e) => {
                log::warn!("Could not load history from storage: {}", e);
                Vec::new()
            }
        };
        entries.truncate(capacity);

        Self {
            entries,
            capacity,
            key: key.to_string(),
            storage,
        }
    }

    /// Record a draw at the current local time
    pub fn record(&mut self, result: &str) -> &HistoryEntry {
        self.record_at(result, &Local::now())
    }

    /// Prepend a draw, evict past capacity, persist
    pub fn record_at<Tz>(&mut self, result: &str, now: &DateTime<Tz>) -> &HistoryEntry
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        self.entries.insert(0, HistoryEntry::at(result, now));
        self.entries.truncate(self.capacity);
        self.save();
        &self.entries[0]
    }

    /// Empty the log if `confirm` agrees. `confirm` is not asked when the
    /// log is already empty. Returns whether anything was cleared.
    pub fn clear_with(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        if !confirm() {
            return false;
        }
        self.entries.clear();
        self.save();
        log::info!("History cleared");
        true
    }

    /// Persist the whole log. Returns whether the write succeeded.
    pub fn save(&mut self) -> bool {
        match write_entries(&mut self.storage, &self.key, &self.entries) {
            Ok(()) => {
                log::debug!("History saved ({} entries)", self.entries.len());
                true
            }
            Err(e) => {
                log::warn!("Could not save history to storage: {}", e);
                false
            }
        }
    }

    /// Render model for the display surface
    pub fn view(&self, placeholder: &str) -> HistoryView {
        if self.entries.is_empty() {
            return HistoryView::Empty {
                placeholder: placeholder.to_string(),
            };
        }
        HistoryView::Rows(
            self.entries
                .iter()
                .map(|e| HistoryRow {
                    result: e.result.clone(),
                    time: e.display_time.clone(),
                })
                .collect(),
        )
    }
}

impl<S> HistoryLog<S> {
    /// Entries, newest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Hand back the storage (e.g. to simulate a restart in tests)
    pub fn into_storage(self) -> S {
        self.storage
    }
}

fn read_entries<S: Storage>(
    storage: &S,
    key: &str,
) -> Result<Option<Vec<HistoryEntry>>, StorageError> {
    let Some(json) = storage.get(key)? else {
        return Ok(None);
    };
    let entries = serde_json::from_str(&json).map_err(|source| StorageError::Decode {
        key: key.to_string(),
        source,
    })?;
    Ok(Some(entries))
}

fn write_entries<S: Storage>(
    storage: &mut S,
    key: &str,
    entries: &[HistoryEntry],
) -> Result<(), StorageError> {
    let json = serde_json::to_string(entries)?;
    storage.set(key, &json)
}
