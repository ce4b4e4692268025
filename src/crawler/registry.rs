//! Registry of crawl jobs known to the running process

use crate::crawler::frontier::{Queue, QueueSnapshot};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// All crawl queues, keyed by job name
#[derive(Debug, Default)]
pub struct QueueRegistry {
    queues: Mutex<HashMap<String, Arc<Queue>>>,
}

impl QueueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Queue>>> {
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a queue under its name, replacing any queue with the same name
    pub fn add(&self, queue: Arc<Queue>) {
        self.lock().insert(queue.name().to_string(), queue);
    }

    pub fn get(&self, name: &str) -> Option<Arc<Queue>> {
        self.lock().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshots of every queue, sorted by name
    pub fn list(&self) -> Vec<QueueSnapshot> {
        let queues: Vec<Arc<Queue>> = self.lock().values().cloned().collect();
        let mut snapshots: Vec<QueueSnapshot> = queues.iter().map(|q| q.snapshot()).collect();
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }
}
