#![forbid(unsafe_code)]

mod error;
mod logging;
mod settings;
mod watchdog;

pub use error::Error;
pub use logging::Logging;
pub use settings::Settings;
pub use watchdog::Watchdog;

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration as read from a TOML file and the command line.
///
/// Every field is optional at this stage; [`Config::resolve`] turns it into
/// [`Settings`] once all sources have been merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub watchdog: Watchdog,
    pub logging: Logging,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the configuration from a TOML file, on top of the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let config = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .extract()?;
        Ok(config)
    }

    /// Check that every required value is present and valid.
    pub fn resolve(&self) -> Result<Settings, Error> {
        Settings::try_from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn load_reads_every_section() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "usbwatchdog.toml",
                r#"
                [watchdog]
                device = "USB\\VID_1234&PID_5678"
                wait_min = 60
                uptime_min = 30
                exec = "systemctl reboot"

                [logging]
                dir = "/var/log/usbwatchdog"
                retention_days = 30
                "#,
            )?;

            let config = Config::load("usbwatchdog.toml").map_err(|e| e.to_string())?;
            assert_eq!(
                config.watchdog.device.as_deref(),
                Some("USB\\VID_1234&PID_5678")
            );
            assert_eq!(config.watchdog.wait_min, Some(60));
            assert_eq!(config.watchdog.uptime_min, Some(30));
            assert_eq!(config.watchdog.exec.as_deref(), Some("systemctl reboot"));
            assert_eq!(config.logging.dir, Some(PathBuf::from("/var/log/usbwatchdog")));
            assert_eq!(config.logging.retention_days, 30);
            Ok(())
        });
    }

    #[test]
    fn load_keeps_defaults_for_missing_keys() {
        Jail::expect_with(|jail| {
            jail.create_file("usbwatchdog.toml", "[watchdog]\nwait_min = 5\n")?;

            let config = Config::load("usbwatchdog.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.watchdog.wait_min, Some(5));
            assert_eq!(config.watchdog.device, None);
            assert_eq!(config.logging, Logging::default());
            Ok(())
        });
    }

    #[test]
    fn empty_strings_read_as_absent() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "usbwatchdog.toml",
                "[watchdog]\ndevice = \"\"\nexec = \"\"\n",
            )?;

            let config = Config::load("usbwatchdog.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.watchdog.device, None);
            assert_eq!(config.watchdog.exec, None);
            Ok(())
        });
    }

    #[test]
    fn negative_threshold_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("usbwatchdog.toml", "[watchdog]\nwait_min = -5\n")?;
            assert!(matches!(
                Config::load("usbwatchdog.toml"),
                Err(Error::Figment(_))
            ));
            Ok(())
        });
    }
}
