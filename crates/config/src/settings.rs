#![forbid(unsafe_code)]

use crate::{Config, Error};
use std::{num::NonZeroU32, path::PathBuf};

/// Fully resolved parameters of one watchdog run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub device: String,
    pub wait_min: NonZeroU32,
    pub uptime_min: NonZeroU32,
    pub exec: String,
    pub log_dir: PathBuf,
    pub retention_days: u32,
}

impl TryFrom<&Config> for Settings {
    type Error = Error;

    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        let watchdog = &config.watchdog;
        let device = non_empty(watchdog.device.as_deref(), "device")?;
        let exec = non_empty(watchdog.exec.as_deref(), "exec")?;
        let log_dir = config
            .logging
            .dir
            .clone()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(Error::Missing("log directory"))?;
        let wait_min = positive(watchdog.wait_min, "wait_min")?;
        let uptime_min = positive(watchdog.uptime_min, "uptime_min")?;

        Ok(Self {
            device,
            wait_min,
            uptime_min,
            exec,
            log_dir,
            retention_days: config.logging.retention_days,
        })
    }
}

fn non_empty(value: Option<&str>, name: &'static str) -> Result<String, Error> {
    match value {
        Some(value) if !value.is_empty() => Ok(value.to_owned()),
        _ => Err(Error::Missing(name)),
    }
}

fn positive(value: Option<u32>, name: &'static str) -> Result<NonZeroU32, Error> {
    let value = value.ok_or(Error::Missing(name))?;
    NonZeroU32::new(value).ok_or(Error::NotPositive(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Logging, Watchdog};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn complete() -> Config {
        Config {
            watchdog: Watchdog {
                device: Some("VID_1234".into()),
                wait_min: Some(60),
                uptime_min: Some(30),
                exec: Some("reboot".into()),
            },
            logging: Logging {
                dir: Some(PathBuf::from("/tmp/usbwatchdog")),
                retention_days: 365,
            },
        }
    }

    #[test]
    fn resolves_complete_config() {
        let settings = complete().resolve().unwrap();
        assert_eq!(settings.device, "VID_1234");
        assert_eq!(settings.wait_min.get(), 60);
        assert_eq!(settings.uptime_min.get(), 30);
        assert_eq!(settings.exec, "reboot");
        assert_eq!(settings.log_dir, PathBuf::from("/tmp/usbwatchdog"));
    }

    #[test]
    fn missing_device_is_an_error() {
        let mut config = complete();
        config.watchdog.device = None;
        assert!(matches!(config.resolve(), Err(Error::Missing("device"))));

        config.watchdog.device = Some(String::new());
        assert!(matches!(config.resolve(), Err(Error::Missing("device"))));
    }

    #[test]
    fn missing_exec_and_dir_are_errors() {
        let mut config = complete();
        config.watchdog.exec = None;
        assert!(matches!(config.resolve(), Err(Error::Missing("exec"))));

        let mut config = complete();
        config.logging.dir = Some(PathBuf::new());
        assert!(matches!(config.resolve(), Err(Error::Missing("log directory"))));
    }

    #[test]
    fn zero_threshold_is_not_positive() {
        let mut config = complete();
        config.watchdog.uptime_min = Some(0);
        assert!(matches!(config.resolve(), Err(Error::NotPositive("uptime_min"))));

        let mut config = complete();
        config.watchdog.wait_min = None;
        assert!(matches!(config.resolve(), Err(Error::Missing("wait_min"))));
    }

    proptest! {
        #[test]
        fn positive_thresholds_resolve(wait in 1u32.., uptime in 1u32..) {
            let mut config = complete();
            config.watchdog.wait_min = Some(wait);
            config.watchdog.uptime_min = Some(uptime);
            let settings = config.resolve().unwrap();
            prop_assert_eq!(settings.wait_min.get(), wait);
            prop_assert_eq!(settings.uptime_min.get(), uptime);
        }
    }
}
