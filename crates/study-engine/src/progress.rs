//! Daily practice counter for Study Buddy.
//!
//! The counter is keyed by calendar date: recording practice on a new day
//! starts the count over. The file-backed store keeps a single
//! [`PracticeRecord`] as pretty-printed JSON.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, StudyError};

/// Returns today's date in the local time zone.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ============================================================================
// PracticeRecord
// ============================================================================

/// Number of topics practiced on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeRecord {
    /// The day this count belongs to (`YYYY-MM-DD`).
    pub date: NaiveDate,

    /// Topics generated on that day.
    pub count: u32,
}

impl PracticeRecord {
    /// The count for `date`: the stored count if the record is for that day,
    /// else zero.
    #[must_use]
    pub fn count_on(record: Option<&Self>, date: NaiveDate) -> u32 {
        record.filter(|r| r.date == date).map_or(0, |r| r.count)
    }

    /// The record after one more practice on `date`.
    #[must_use]
    pub fn incremented(record: Option<&Self>, date: NaiveDate) -> Self {
        Self {
            date,
            count: Self::count_on(record, date).saturating_add(1),
        }
    }
}

// ============================================================================
// ProgressStore
// ============================================================================

/// Read/write contract for the daily practice counter.
pub trait ProgressStore: Send {
    /// Increments the counter for `date` and returns the new count.
    ///
    /// A stored record for any other day is replaced, so the count restarts.
    fn record_practice(&mut self, date: NaiveDate) -> Result<u32>;

    /// Returns the count for `date` without changing anything.
    fn practiced_on(&self, date: NaiveDate) -> Result<u32>;
}

/// In-process counter that is lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    record: Option<PracticeRecord>,
}

impl MemoryProgressStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with an existing record.
    #[must_use]
    pub const fn with_record(record: PracticeRecord) -> Self {
        Self {
            record: Some(record),
        }
    }
}

impl ProgressStore for MemoryProgressStore {
    fn record_practice(&mut self, date: NaiveDate) -> Result<u32> {
        let record = PracticeRecord::incremented(self.record.as_ref(), date);
        self.record = Some(record);
        Ok(record.count)
    }

    fn practiced_on(&self, date: NaiveDate) -> Result<u32> {
        Ok(PracticeRecord::count_on(self.record.as_ref(), date))
    }
}

/// Counter persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    path: PathBuf,
}

impl FileProgressStore {
    /// Creates a store at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored record.
    ///
    /// Returns `Ok(None)` if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::ProgressFileCorrupted` if the file is not a valid
    /// record, or `StudyError::Io` if it cannot be read.
    pub fn load(&self) -> Result<Option<PracticeRecord>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StudyError::Io(e)),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| StudyError::progress_corrupted(&self.path, e.to_string()))
    }

    /// Writes the record, creating parent directories as needed.
    ///
    /// The record is written to a sibling temp file, then renamed into place.
    /// The temp file is removed if the rename fails.
    pub fn save(&self, record: &PracticeRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(record)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            std::fs::remove_file(&tmp_path).ok();
            return Err(StudyError::Io(e));
        }

        debug!(path = %self.path.display(), date = %record.date, count = record.count, "Progress saved");
        Ok(())
    }
}

impl ProgressStore for FileProgressStore {
    fn record_practice(&mut self, date: NaiveDate) -> Result<u32> {
        let existing = self.load()?;
        let record = PracticeRecord::incremented(existing.as_ref(), date);
        self.save(&record)?;

        info!(date = %record.date, count = record.count, "Practice recorded");
        Ok(record.count)
    }

    fn practiced_on(&self, date: NaiveDate) -> Result<u32> {
        Ok(PracticeRecord::count_on(self.load()?.as_ref(), date))
    }
}
