#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Logging {
    /// Directory holding the monthly logs and the last-success record.
    pub dir: Option<PathBuf>,

    /// Logs older than this many days are deleted.
    pub retention_days: u32,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            dir: None,
            retention_days: 365,
        }
    }
}
