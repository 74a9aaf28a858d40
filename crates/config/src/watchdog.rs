#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Watchdog {
    /// Fragment of the device instance path to look for, eg. `VID_1234&PID_5678`.
    #[serde_as(as = "NoneAsEmptyString")]
    pub device: Option<String>,

    /// Minutes the device may be missing before the command runs.
    pub wait_min: Option<u32>,

    /// Minimum system uptime in minutes before the command may run.
    pub uptime_min: Option<u32>,

    /// Command to execute when both thresholds are met.
    #[serde_as(as = "NoneAsEmptyString")]
    pub exec: Option<String>,
}
