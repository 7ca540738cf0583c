use std::ops::Add;
use std::str::FromStr;

use serde::Serialize;
use strum::EnumString;
use thiserror::Error;

/// Task states reported by the Evergreen versions endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TaskStatus {
    Success,
    Failed,
    Started,
    Dispatched,
    Undispatched,
}

/// A task status outside the five recognized kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task status '{0}'")]
pub struct UnknownStatus(pub String);

/// Per-status task counts for a variant or a whole commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub success: u32,
    pub failed: u32,
    pub undispatched: u32,
    pub dispatched: u32,
    pub started: u32,
}

impl StatusTally {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Count one task with the given raw status.
    pub fn record(&mut self, status: &str) -> Result<TaskStatus, UnknownStatus> {
        let status =
            TaskStatus::from_str(status).map_err(|_| UnknownStatus(status.to_string()))?;
        match status {
            TaskStatus::Success => self.success += 1,
            TaskStatus::Failed => self.failed += 1,
            TaskStatus::Started => self.started += 1,
            TaskStatus::Dispatched => self.dispatched += 1,
            TaskStatus::Undispatched => self.undispatched += 1,
        }
        Ok(status)
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            success: self.success + other.success,
            failed: self.failed + other.failed,
            undispatched: self.undispatched + other.undispatched,
            dispatched: self.dispatched + other.dispatched,
            started: self.started + other.started,
        }
    }

    pub fn total(&self) -> u32 {
        self.success + self.failed + self.undispatched + self.dispatched + self.started
    }
}

impl Add for StatusTally {
    type Output = StatusTally;

    fn add(self, rhs: Self) -> Self::Output {
        self.merge(rhs)
    }
}
