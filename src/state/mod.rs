//! State module for tracking crawl job progress
//!
//! # Components
//!
//! - `JobState`: the lifecycle of one crawl job (created, seeding, indexed, processing, finished, failed)
//! - `QueueStatus`: the coarse status reported for a job's queue

mod job_state;

// Re-export main types
pub use job_state::{JobState, QueueStatus};
