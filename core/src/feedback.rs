use anyhow::Result;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, OpenOptions};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub timestamp: String,
    pub course_title: String,
    pub rating: u8,
    pub comment: String,
}

impl FeedbackEntry {
    /// Stamp a new entry with the current UTC time.
    pub fn new(course_title: impl Into<String>, rating: u8, comment: impl Into<String>) -> Result<Self> {
        let timestamp = time::OffsetDateTime::now_utc().format(&Rfc3339)?;
        Ok(Self { timestamp, course_title: course_title.into(), rating, comment: comment.into() })
    }
}

/// Append-only CSV of user feedback. Written by the display layer only.
pub struct FeedbackStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FeedbackStore {
    /// Open the store, creating the file with its header when missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            create_dir_all(dir)?;
        }
        let needs_header = std::fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);
        if needs_header {
            let f = OpenOptions::new().create(true).append(true).open(&path)?;
            let mut w = csv::Writer::from_writer(f);
            w.write_record(["timestamp", "course_title", "rating", "comment"])?;
            w.flush()?;
        }
        Ok(Self { path, lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn append(&self, entry: &FeedbackEntry) -> Result<()> {
        let _guard = self.lock.lock();
        let f = OpenOptions::new().append(true).open(&self.path)?;
        let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(f);
        w.serialize(entry)?;
        w.flush()?;
        Ok(())
    }
}
