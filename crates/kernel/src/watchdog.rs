#![forbid(unsafe_code)]

use crate::{
    Error,
    action::ActionRunner,
    clock::Clock,
    decision::{Decision, Inputs, Thresholds, Verdict, decide},
    device::{DevicePattern, DeviceTree, find_device},
    event::WatchdogEvent,
    store::{StoredTimestamp, TimestampStore},
    uptime::UptimeSource,
};
use config::Settings;
use tracing::debug;

/// Collaborators the watchdog talks to during a run.
pub struct Services {
    pub devices: Box<dyn DeviceTree>,
    pub store: Box<dyn TimestampStore>,
    pub clock: Box<dyn Clock>,
    pub uptime: Box<dyn UptimeSource>,
    pub runner: Box<dyn ActionRunner>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub decision: Decision,
    pub events: Vec<WatchdogEvent>,
}

pub struct Watchdog {
    pattern: DevicePattern,
    thresholds: Thresholds,
    command: String,
    services: Services,
}

impl Watchdog {
    pub fn new(settings: &Settings, services: Services) -> Result<Self, Error> {
        Ok(Self {
            pattern: DevicePattern::new(&settings.device)?,
            thresholds: Thresholds {
                wait_min: settings.wait_min,
                uptime_min: settings.uptime_min,
            },
            command: settings.exec.clone(),
            services,
        })
    }

    /// Execute a single check-and-decide cycle.
    ///
    /// Only an unreachable device enumeration fails the run. Problems with
    /// the last-success record or the command are reported as events.
    pub fn run_once(&self) -> Result<Report, Error> {
        self.run_once_with(|_| {})
    }

    /// Same as [`Watchdog::run_once`], handing every event to `on_event` as
    /// soon as it happens, before any later step runs.
    pub fn run_once_with(&self, on_event: impl FnMut(&WatchdogEvent)) -> Result<Report, Error> {
        let mut events = Events {
            seen: Vec::new(),
            on_event,
        };
        events.push(WatchdogEvent::CheckStarted {
            pattern: self.pattern.to_string(),
        });

        let search = find_device(self.services.devices.as_ref(), &self.pattern)?;
        debug!(visited = search.visited, present = search.is_present(), "device tree searched");

        let now = self.services.clock.now();
        let stored = if search.is_present() {
            None
        } else {
            self.read_record(&mut events)
        };

        let Verdict {
            decision,
            record,
            events: decided,
        } = decide(&Inputs {
            sighting: search.matched.as_deref(),
            stored: stored.as_ref(),
            now,
            uptime: self.services.uptime.uptime(),
            thresholds: self.thresholds,
        });
        for event in decided {
            events.push(event);
        }

        if let Some(at) = record {
            match self.services.store.write(at) {
                Ok(()) => events.push(WatchdogEvent::TimestampUpdated { at }),
                Err(err) => events.push(WatchdogEvent::StoreUnavailable {
                    reason: err.to_string(),
                }),
            }
        }

        if decision == Decision::Triggered {
            events.push(WatchdogEvent::Launching {
                command: self.command.clone(),
            });
            if let Err(err) = self.services.runner.launch(&self.command) {
                events.push(WatchdogEvent::LaunchFailed {
                    command: self.command.clone(),
                    reason: err.to_string(),
                });
            }
        }

        Ok(Report {
            decision,
            events: events.seen,
        })
    }

    fn read_record<F>(&self, events: &mut Events<F>) -> Option<StoredTimestamp>
    where
        F: FnMut(&WatchdogEvent),
    {
        match self.services.store.read() {
            Ok(stored) => stored,
            Err(err) => {
                events.push(WatchdogEvent::StoreUnavailable {
                    reason: err.to_string(),
                });
                Some(StoredTimestamp::Unreadable)
            }
        }
    }
}

/// Events of one run, forwarded to the caller as they are recorded.
struct Events<F> {
    seen: Vec<WatchdogEvent>,
    on_event: F,
}

impl<F: FnMut(&WatchdogEvent)> Events<F> {
    fn push(&mut self, event: WatchdogEvent) {
        (self.on_event)(&event);
        self.seen.push(event);
    }
}
