use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use config::Config;
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

/// usbwatchdog: runs a recovery command when a USB device stays missing
///
/// Each invocation checks once whether a device whose instance path contains
/// the given fragment is attached. A sighting is recorded in the log
/// directory. When the device has been missing for at least `wait-min`
/// minutes and the system has been up for at least `uptime-min` minutes, the
/// command is executed. Schedule it periodically, eg. from cron or a systemd
/// timer.
#[derive(Debug, Parser, Clone)]
#[command(about, long_about, version)]
pub struct Cli {
    /// USB device instance path, or a fragment of it (eg. `VID_1234&PID_5678`).
    #[arg(long = "uid-usb", visible_alias = "uid_usb", value_name = "UID_USB")]
    pub uid_usb: Option<String>,

    /// Max allowed minutes without USB connection.
    #[arg(long = "wait-min", visible_alias = "wait_min", value_name = "MINUTES")]
    #[arg(value_parser = validate_minutes)]
    pub wait_min: Option<u32>,

    /// Min system uptime in minutes before executing the command.
    #[arg(long = "uptime-min", visible_alias = "uptime_min", value_name = "MINUTES")]
    #[arg(value_parser = validate_minutes)]
    pub uptime_min: Option<u32>,

    /// Command to execute when conditions are met.
    #[arg(long, value_name = "COMMAND")]
    pub exec: Option<String>,

    /// Directory to store logs and the last-success record.
    #[arg(long, value_name = "PATH")]
    pub pathlog: Option<PathBuf>,

    /// Path to configuration file.
    ///
    /// Command line values take precedence over the file.
    #[arg(short, long, value_parser = validate_file)]
    pub conffile: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,
}

impl Cli {
    /// No arguments at all, or one of the help spellings clap does not know.
    pub fn is_help_request<I, S>(args: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut args = args.into_iter().peekable();
        if args.peek().is_none() {
            return true;
        }
        args.any(|arg| matches!(arg.as_ref().to_str(), Some("-?" | "/?" | "?")))
    }

    /// Override configuration values with the ones given on the command line.
    pub fn apply(&self, config: &mut Config) {
        if let Some(device) = &self.uid_usb {
            config.watchdog.device = Some(device.clone());
        }
        if let Some(wait_min) = self.wait_min {
            config.watchdog.wait_min = Some(wait_min);
        }
        if let Some(uptime_min) = self.uptime_min {
            config.watchdog.uptime_min = Some(uptime_min);
        }
        if let Some(exec) = &self.exec {
            config.watchdog.exec = Some(exec.clone());
        }
        if let Some(dir) = &self.pathlog {
            config.logging.dir = Some(dir.clone());
        }
    }
}

/// Check if the file exists.
#[inline(always)]
fn validate_file(file: &str) -> Result<PathBuf, String> {
    let path = Path::new(file);
    if path.exists() {
        Ok(path.to_owned())
    } else {
        Err(format!("File not found: {:?}", path))
    }
}

/// Validate a threshold in minutes.
#[inline(always)]
fn validate_minutes(minutes: &str) -> Result<u32, String> {
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| format!("`{minutes}` is not a valid number of minutes"))?;
    if minutes > 0 {
        Ok(minutes)
    } else {
        Err("Minutes must be greater than zero".to_string())
    }
}
