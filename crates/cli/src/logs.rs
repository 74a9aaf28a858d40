//! Monthly log files: naming, subscriber setup, rendering and retention.

use crate::error::Error;
use chrono::{DateTime, Local};
use kernel::{
    WatchdogEvent,
    event::Severity,
    store::TIMESTAMP_FORMAT,
};
use std::{
    fs::{self, OpenOptions},
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, SystemTime},
};
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{
    Layer, fmt, fmt::time::ChronoLocal, layer::SubscriberExt, util::SubscriberInitExt,
};

pub const LOG_PREFIX: &str = "usbwatchdog_";

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Line written at the start of every run.
pub fn separator() -> String {
    "-".repeat(60)
}

/// Log file for the calendar month of `now`, eg. `usbwatchdog_202401.log`.
pub fn month_log_path(dir: &Path, now: &DateTime<Local>) -> PathBuf {
    dir.join(format!("{LOG_PREFIX}{}.log", now.format("%Y%m")))
}

pub fn prepare_dir(dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(dir).map_err(|err| Error::LogDir(dir.to_owned(), err))
}

/// Log to stdout at `console` level and append INFO and above to the
/// current month's log file.
pub fn init(dir: &Path, now: &DateTime<Local>, console: LevelFilter) -> Result<(), Error> {
    let path = month_log_path(dir, now);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|err| Error::LogFile(path, err))?;

    let console_layer = fmt::layer()
        .with_writer(io::stdout)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_owned()))
        .with_ansi(io::stdout().is_terminal())
        .with_target(false)
        .with_level(true)
        .with_filter(console);

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_owned()))
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .with_filter(LevelFilter::INFO);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;
    Ok(())
}

/// Write one watchdog event to the log.
pub fn emit(event: &WatchdogEvent) {
    match event.severity() {
        Severity::Info => info!("{event}"),
        Severity::Warn => warn!("{event}"),
        Severity::Error => error!("{event}"),
    }
}

/// Delete monthly logs older than `retention_days`.
///
/// Only regular files named like our logs are considered; the last-success
/// record and foreign files are left alone. Returns the deleted paths.
pub fn prune(dir: &Path, retention_days: u32, now: SystemTime) -> Result<Vec<PathBuf>, Error> {
    let dir_str = dir
        .to_str()
        .ok_or_else(|| Error::InvalidPath(dir.to_owned()))?;
    let pattern = Path::new(&glob::Pattern::escape(dir_str)).join(format!("{LOG_PREFIX}*.log"));
    let pattern = pattern
        .to_str()
        .ok_or_else(|| Error::InvalidPath(dir.to_owned()))?;

    let mut removed = Vec::new();
    for entry in glob::glob(pattern)? {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                warn!(%err, "cannot inspect log file");
                continue;
            }
        };
        let Ok(meta) = fs::metadata(&path) else {
            continue;
        };
        let Ok(modified) = meta.modified() else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        if age.as_secs() / SECONDS_PER_DAY > u64::from(retention_days) {
            match fs::remove_file(&path) {
                Ok(()) => removed.push(path),
                Err(err) => warn!(path = %path.display(), %err, "cannot delete old log"),
            }
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn touch(path: &Path, age_days: u64) {
        let file = fs::File::create(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_days * SECONDS_PER_DAY))
            .unwrap();
    }

    #[test]
    fn log_file_per_month() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap();
        assert_eq!(
            month_log_path(Path::new("/logs"), &now),
            PathBuf::from("/logs/usbwatchdog_202403.log")
        );
    }

    #[test]
    fn prune_removes_only_old_logs() {
        let dir = tempdir().unwrap();
        let old = dir.path().join("usbwatchdog_202201.log");
        let fresh = dir.path().join("usbwatchdog_202401.log");
        let record = dir.path().join("usbwatchdog_last_success.txt");
        let foreign = dir.path().join("other_202201.log");
        touch(&old, 400);
        touch(&fresh, 10);
        touch(&record, 400);
        touch(&foreign, 400);

        let removed = prune(dir.path(), 365, SystemTime::now()).unwrap();

        assert_eq!(removed, vec![old.clone()]);
        assert!(!old.exists());
        assert!(fresh.exists());
        assert!(record.exists());
        assert!(foreign.exists());
    }

    #[test]
    fn prune_keeps_logs_at_retention_boundary() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("usbwatchdog_202301.log");
        touch(&log, 30);

        assert!(prune(dir.path(), 30, SystemTime::now()).unwrap().is_empty());
        assert!(log.exists());
    }

    #[test]
    fn prune_handles_glob_characters_in_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("logs[1]");
        fs::create_dir(&nested).unwrap();
        let old = nested.join("usbwatchdog_202001.log");
        touch(&old, 1000);

        assert_eq!(prune(&nested, 365, SystemTime::now()).unwrap(), vec![old]);
    }
}
