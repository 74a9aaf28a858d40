#![forbid(unsafe_code)]

use crate::Error;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::debug;

/// Textual format of persisted timestamps: local time, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Name of the last-success record inside the log directory.
pub const RECORD_FILE_NAME: &str = "usbwatchdog_last_success.txt";

pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Content of an existing last-success record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredTimestamp {
    Valid(DateTime<Local>),
    /// The record exists but does not hold a usable time.
    Malformed(String),
    /// The record could not be read at all.
    Unreadable,
}

impl StoredTimestamp {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .ok()
            // skipped local times (DST gaps) have no instant
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
            .map_or_else(|| Self::Malformed(raw.to_owned()), Self::Valid)
    }
}

pub trait TimestampStore {
    /// Read the record; `None` if it was never written.
    fn read(&self) -> Result<Option<StoredTimestamp>, Error>;

    /// Replace the record with `at`.
    fn write(&self, at: DateTime<Local>) -> Result<(), Error>;
}

/// Last-success record kept in a single text file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(RECORD_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TimestampStore for FileStore {
    fn read(&self) -> Result<Option<StoredTimestamp>, Error> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(StoredTimestamp::parse(
                content.lines().next().unwrap_or_default(),
            ))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, at: DateTime<Local>) -> Result<(), Error> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // readers see either the old record or the new one, never a partial write
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(format_timestamp(&at).as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|err| err.error)?;

        debug!(path = %self.path.display(), "last-success record written");
        Ok(())
    }
}
