//! Crawl job state definitions
//!
//! A crawl job walks `Created -> Seeding -> Indexed -> Processing -> Finished`.
//! The seed phase (`Seeding`, `Indexed`) may also exit to `Failed`.
use serde::Serialize;
use std::fmt;

/// Represents the current state of one crawl job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    // ===== Active States =====
    /// Job exists but no page has been requested yet
    Created,

    /// The seed page is being fetched and indexed
    Seeding,

    /// The seed page was indexed; the background drain has not started
    Indexed,

    /// The background task is draining the frontier
    Processing,

    // ===== Terminal States =====
    /// The frontier was drained to empty
    Finished,

    /// The seed page could not be crawled; the job never started
    Failed,
}

impl JobState {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }

    /// Returns true if the job still has work ahead of it
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: JobState) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::Seeding)
                | (Self::Seeding, Self::Indexed)
                | (Self::Seeding, Self::Failed)
                | (Self::Indexed, Self::Processing)
                | (Self::Indexed, Self::Failed)
                | (Self::Processing, Self::Finished)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Seeding => "seeding",
            Self::Indexed => "indexed",
            Self::Processing => "processing",
            Self::Finished => "finished",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse, externally reported status of a crawl job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    Active,
    Finished,
    Failed,
}

impl From<JobState> for QueueStatus {
    fn from(state: JobState) -> Self {
        match state {
            JobState::Finished => Self::Finished,
            JobState::Failed => Self::Failed,
            _ => Self::Active,
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Finished => "finished",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
