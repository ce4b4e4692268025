//! Crawl frontier for a single crawl job
//!
//! The frontier keeps the FIFO list of pending URLs together with the set of
//! every URL the job has ever accepted. Both live behind one lock; callers
//! only see atomic operations and never the lock itself.

use crate::state::{JobState, QueueStatus};
use crate::KensakuError;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Pending URLs, seen URLs and lifecycle state of one crawl job
#[derive(Debug)]
pub struct Queue {
    name: String,
    inner: Mutex<Frontier>,
}

#[derive(Debug)]
struct Frontier {
    state: JobState,
    items: VecDeque<String>,
    seen: HashSet<String>,
}

/// Read-only copy of a queue, as reported to status readers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    pub name: String,
    pub status: QueueStatus,
    pub state: JobState,
    pub items: Vec<String>,
    pub seen: usize,
}

impl Queue {
    /// Creates an empty queue in the `Created` state
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: Mutex::new(Frontier {
                state: JobState::Created,
                items: VecDeque::new(),
                seen: HashSet::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> MutexGuard<'_, Frontier> {
        // The guarded data stays consistent even if a holder panicked:
        // every mutation below is a single collection call.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `url` to the tail unless the job has already seen it
    ///
    /// Returns `true` if the URL was inserted. Among concurrent callers
    /// passing the same URL exactly one gets `true`.
    pub fn enqueue(&self, url: &str) -> bool {
        let mut frontier = self.lock();
        if !frontier.seen.insert(url.to_string()) {
            return false;
        }
        frontier.items.push_back(url.to_string());
        true
    }

    /// Records `url` as seen without queueing it
    ///
    /// Used for the seed page, which is fetched directly.
    pub fn mark_seen(&self, url: &str) -> bool {
        self.lock().seen.insert(url.to_string())
    }

    /// Removes and returns the head of the queue
    ///
    /// # Errors
    ///
    /// `KensakuError::EmptyQueue` when nothing is pending.
    pub fn dequeue(&self) -> Result<String, KensakuError> {
        self.lock().items.pop_front().ok_or(KensakuError::EmptyQueue)
    }

    /// Number of URLs currently pending
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Number of distinct URLs accepted over the job's lifetime
    pub fn seen_count(&self) -> usize {
        self.lock().seen.len()
    }

    pub fn has_seen(&self, url: &str) -> bool {
        self.lock().seen.contains(url)
    }

    pub fn state(&self) -> JobState {
        self.lock().state
    }

    pub fn status(&self) -> QueueStatus {
        self.state().into()
    }

    /// Moves the job to `next`
    ///
    /// # Errors
    ///
    /// `KensakuError::InvalidTransition` if the state machine forbids the move;
    /// the current state is left unchanged.
    pub fn transition(&self, next: JobState) -> Result<(), KensakuError> {
        let mut frontier = self.lock();
        if !frontier.state.can_transition_to(next) {
            return Err(KensakuError::InvalidTransition {
                from: frontier.state,
                to: next,
            });
        }
        frontier.state = next;
        Ok(())
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        let frontier = self.lock();
        QueueSnapshot {
            name: self.name.clone(),
            status: frontier.state.into(),
            state: frontier.state,
            items: frontier.items.iter().cloned().collect(),
            seen: frontier.seen.len(),
        }
    }
}
