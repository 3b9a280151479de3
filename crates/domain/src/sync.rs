use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// A successful attempt to schedule a single reminder
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleOutcome {
    /// A new local notification was created with this handle
    Scheduled(String),
    /// A previous run already scheduled the reminder with this handle
    AlreadyScheduled(String),
}

impl ScheduleOutcome {
    pub fn handle(&self) -> &str {
        match self {
            Self::Scheduled(handle) | Self::AlreadyScheduled(handle) => handle,
        }
    }
}

/// Why a reminder did not get scheduled
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Reminder entry is missing a trigger time or medication name")]
    InvalidEntry,
    #[error("Trigger time `{0}` could not be parsed")]
    MalformedTimestamp(String),
    #[error("Trigger time is in the past")]
    PastDue,
    #[error("The notification platform rejected the reminder")]
    PlatformRejected,
}

impl ScheduleError {
    /// Policy filters and bad server data are skips, the rest are failures
    pub fn is_skip(&self) -> bool {
        !matches!(self, Self::PlatformRejected)
    }
}

/// Outcome counters of one reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileSummary {
    pub scheduled: usize,
    pub already_scheduled: usize,
    pub skipped: usize,
    pub failed: usize,
    pub pruned: usize,
}

impl ReconcileSummary {
    pub fn record(&mut self, res: &Result<ScheduleOutcome, ScheduleError>) {
        match res {
            Ok(ScheduleOutcome::Scheduled(_)) => self.scheduled += 1,
            Ok(ScheduleOutcome::AlreadyScheduled(_)) => self.already_scheduled += 1,
            Err(e) if e.is_skip() => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.scheduled + self.already_scheduled + self.skipped + self.failed
    }
}

/// The moments at which a reconciliation run is started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerOccasion {
    Startup,
    Foreground,
    NotificationTap,
    /// Requested through the host api
    Manual,
}

impl Display for TriggerOccasion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Startup => "startup",
            Self::Foreground => "foreground",
            Self::NotificationTap => "notification_tap",
            Self::Manual => "manual",
        };
        write!(f, "{}", name)
    }
}
