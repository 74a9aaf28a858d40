#![forbid(unsafe_code)]

use crate::store::format_timestamp;
use chrono::{DateTime, Local};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Something worth telling the operator about during a run.
///
/// Events are collected while deciding and rendered by the caller, so the
/// decision logic itself never writes logs.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchdogEvent {
    CheckStarted {
        pattern: String,
    },
    DeviceFound {
        device_id: String,
    },
    TimestampUpdated {
        at: DateTime<Local>,
    },
    NoHistory,
    MalformedTimestamp {
        raw: String,
    },
    StoreUnavailable {
        reason: String,
    },
    LastSeen {
        at: DateTime<Local>,
    },
    Measured {
        elapsed_minutes: f64,
        uptime_minutes: u64,
    },
    WaitCheck {
        elapsed_minutes: f64,
        wait_min: u32,
    },
    UptimeCheck {
        uptime_minutes: u64,
        uptime_min: u32,
    },
    ConditionsMet,
    ConditionsNotMet,
    Launching {
        command: String,
    },
    LaunchFailed {
        command: String,
        reason: String,
    },
}

impl WatchdogEvent {
    pub fn severity(&self) -> Severity {
        match self {
            Self::MalformedTimestamp { .. } | Self::StoreUnavailable { .. } => Severity::Warn,
            Self::LaunchFailed { .. } => Severity::Error,
            _ => Severity::Info,
        }
    }
}

fn comparison(met: bool) -> &'static str {
    if met { ">=" } else { "<" }
}

impl fmt::Display for WatchdogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckStarted { pattern } => write!(f, "Starting check for USB device: {pattern}"),
            Self::DeviceFound { device_id } => write!(f, "Found connected device: {device_id}"),
            Self::TimestampUpdated { at } => {
                write!(f, "USB device found. Timestamp updated to {}", format_timestamp(at))
            }
            Self::NoHistory => f.write_str("USB device not found. No last-success timestamp, nothing to do"),
            Self::MalformedTimestamp { raw } => write!(
                f,
                "USB device not found. Last-success timestamp {raw:?} is unreadable, treating as no history"
            ),
            Self::StoreUnavailable { reason } => write!(f, "Last-success record unavailable: {reason}"),
            Self::LastSeen { at } => write!(f, "Last success timestamp read: {}", format_timestamp(at)),
            Self::Measured {
                elapsed_minutes,
                uptime_minutes,
            } => write!(
                f,
                "USB device not found. Time since last success: {elapsed_minutes:.2} min, Uptime: {uptime_minutes} min"
            ),
            Self::WaitCheck {
                elapsed_minutes,
                wait_min,
            } => write!(
                f,
                "Time since last success ({}) {} wait_min ({wait_min})",
                elapsed_minutes.trunc(),
                comparison(*elapsed_minutes >= f64::from(*wait_min)),
            ),
            Self::UptimeCheck {
                uptime_minutes,
                uptime_min,
            } => write!(
                f,
                "System uptime ({uptime_minutes}) {} uptime_min ({uptime_min})",
                comparison(*uptime_minutes >= u64::from(*uptime_min)),
            ),
            Self::ConditionsMet => f.write_str("Conditions met"),
            Self::ConditionsNotMet => f.write_str("Conditions NOT met. No action taken"),
            Self::Launching { command } => write!(f, "Executing command: {command}"),
            Self::LaunchFailed { command, reason } => {
                write!(f, "Failed to execute command {command:?}: {reason}")
            }
        }
    }
}
