#![forbid(unsafe_code)]

use std::time::Duration;
use sysinfo::System;

pub trait UptimeSource {
    /// Time elapsed since the host started.
    fn uptime(&self) -> Duration;
}

#[derive(Debug, Default)]
pub struct SystemUptime;

impl UptimeSource for SystemUptime {
    fn uptime(&self) -> Duration {
        Duration::from_secs(System::uptime())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedUptime(pub Duration);

impl UptimeSource for FixedUptime {
    fn uptime(&self) -> Duration {
        self.0
    }
}

/// Uptime in whole minutes, rounded down.
pub fn whole_minutes(uptime: Duration) -> u64 {
    uptime.as_secs() / 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_uptime() {
        assert!(SystemUptime.uptime() > Duration::ZERO);
    }

    #[test]
    fn minutes_round_down() {
        assert_eq!(whole_minutes(Duration::from_secs(59)), 0);
        assert_eq!(whole_minutes(Duration::from_secs(60)), 1);
        assert_eq!(whole_minutes(Duration::from_secs(12_059)), 200);
    }
}
