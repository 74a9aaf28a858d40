//! The watchdog's decision, as a pure function of one run's inputs.

#![forbid(unsafe_code)]

use crate::{event::WatchdogEvent, store::StoredTimestamp, uptime::whole_minutes};
use chrono::{DateTime, Local};
use std::{num::NonZeroU32, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The device is present; the record moves to now.
    DeviceFound,
    /// The device is missing and there is no usable sighting to measure from.
    NoHistory,
    /// The device is missing but at least one threshold is not reached.
    ConditionsNotMet,
    /// The device has been missing long enough; run the command.
    Triggered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Minutes since the last sighting before the command may run.
    pub wait_min: NonZeroU32,
    /// Minutes of host uptime before the command may run.
    pub uptime_min: NonZeroU32,
}

#[derive(Debug, Clone, Copy)]
pub struct Inputs<'a> {
    /// Identifier of the matched device, if the search found one.
    pub sighting: Option<&'a str>,
    pub stored: Option<&'a StoredTimestamp>,
    pub now: DateTime<Local>,
    pub uptime: Duration,
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub decision: Decision,
    /// New value for the last-success record, if it must be written.
    pub record: Option<DateTime<Local>>,
    pub events: Vec<WatchdogEvent>,
}

impl Verdict {
    fn passive(decision: Decision, events: Vec<WatchdogEvent>) -> Self {
        Self {
            decision,
            record: None,
            events,
        }
    }

    pub fn should_launch(&self) -> bool {
        self.decision == Decision::Triggered
    }
}

pub fn decide(inputs: &Inputs<'_>) -> Verdict {
    if let Some(device_id) = inputs.sighting {
        return Verdict {
            decision: Decision::DeviceFound,
            record: Some(inputs.now),
            events: vec![WatchdogEvent::DeviceFound {
                device_id: device_id.to_owned(),
            }],
        };
    }

    let last_seen = match inputs.stored {
        None | Some(StoredTimestamp::Unreadable) => {
            return Verdict::passive(Decision::NoHistory, vec![WatchdogEvent::NoHistory]);
        }
        // an unusable record is not "infinitely long ago"
        Some(StoredTimestamp::Malformed(raw)) => {
            return Verdict::passive(
                Decision::NoHistory,
                vec![WatchdogEvent::MalformedTimestamp { raw: raw.clone() }],
            );
        }
        Some(StoredTimestamp::Valid(at)) => *at,
    };

    let elapsed_minutes = elapsed_minutes(last_seen, inputs.now);
    let uptime_minutes = whole_minutes(inputs.uptime);
    let Thresholds {
        wait_min,
        uptime_min,
    } = inputs.thresholds;

    let waited = elapsed_minutes >= f64::from(wait_min.get());
    let warmed_up = uptime_minutes >= u64::from(uptime_min.get());

    let mut events = vec![
        WatchdogEvent::LastSeen { at: last_seen },
        WatchdogEvent::Measured {
            elapsed_minutes,
            uptime_minutes,
        },
        WatchdogEvent::WaitCheck {
            elapsed_minutes,
            wait_min: wait_min.get(),
        },
        WatchdogEvent::UptimeCheck {
            uptime_minutes,
            uptime_min: uptime_min.get(),
        },
    ];

    let decision = if waited && warmed_up {
        events.push(WatchdogEvent::ConditionsMet);
        Decision::Triggered
    } else {
        events.push(WatchdogEvent::ConditionsNotMet);
        Decision::ConditionsNotMet
    };
    Verdict::passive(decision, events)
}

/// Fractional minutes from `since` to `now`; negative if the clock went back.
fn elapsed_minutes(since: DateTime<Local>, now: DateTime<Local>) -> f64 {
    (now - since).num_milliseconds() as f64 / 60_000.0
}
