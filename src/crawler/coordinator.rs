//! Crawl orchestration
//!
//! A crawl job runs in two phases:
//! - the seed page is fetched, stored, indexed and its links queued while the
//!   caller waits; any failure here fails the whole job
//! - a spawned task then drains the job's queue one page at a time, pausing
//!   between fetches, and logs and skips pages that fail

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Queue;
use crate::crawler::parser::parse_page;
use crate::index;
use crate::state::JobState;
use crate::storage::{Document, Storage};
use crate::url::{canonical_seed, process_url};
use crate::KensakuError;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Runs crawl jobs against a shared document store
pub struct Crawler<S> {
    storage: Arc<Mutex<S>>,
    fetcher: Fetcher,
    politeness_delay: Duration,
}

// Derived Clone would require `S: Clone`; only the Arc is cloned.
impl<S> Clone for Crawler<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            fetcher: self.fetcher.clone(),
            politeness_delay: self.politeness_delay,
        }
    }
}

impl<S: Storage + Send + 'static> Crawler<S> {
    /// Creates a crawler
    ///
    /// # Arguments
    ///
    /// * `storage` - Store shared with the search engine and other jobs
    /// * `fetcher` - HTTP fetcher used for every page
    /// * `politeness_delay` - Pause between two fetches of the same job
    pub fn new(storage: Arc<Mutex<S>>, fetcher: Fetcher, politeness_delay: Duration) -> Self {
        Self {
            storage,
            fetcher,
            politeness_delay,
        }
    }

    /// Creates a crawler from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Crawler with an HTTP client built from `[user-agent]`
    ///   and `[crawler]`
    /// * `Err(KensakuError)` - The HTTP client could not be built
    pub fn from_config(config: &Config, storage: Arc<Mutex<S>>) -> Result<Self, KensakuError> {
        let fetcher = Fetcher::from_config(&config.user_agent, &config.crawler)?;
        Ok(Self::new(
            storage,
            fetcher,
            Duration::from_millis(config.crawler.politeness_delay),
        ))
    }

    pub fn storage(&self) -> &Arc<Mutex<S>> {
        &self.storage
    }

    /// Starts a crawl job at `url`
    ///
    /// The seed page is processed before this returns. On success the rest
    /// of the site is crawled by a background task whose handle is returned;
    /// awaiting it waits for the queue to drain. Dropping it detaches the task.
    ///
    /// # Errors
    ///
    /// * `KensakuError::InvalidUrl` - `url` has no usable host
    /// * `KensakuError::Http` / `KensakuError::UnreachableUrl` - the seed
    ///   could not be fetched
    /// * `KensakuError::Storage` / `KensakuError::Task` - the seed document or
    ///   its index could not be written
    /// * `KensakuError::InvalidTransition` - `queue` was already used
    ///
    /// The queue ends up in `Failed` in every case but the last.
    pub async fn crawl(&self, url: &str, queue: Arc<Queue>) -> Result<JoinHandle<()>, KensakuError> {
        queue.transition(JobState::Seeding)?;

        let (seed, site) = match canonical_seed(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::error!("Cannot crawl {}: {}", url, e);
                queue.transition(JobState::Failed)?;
                return Err(e);
            }
        };

        tracing::info!("Starting crawl of {} (job {})", site, queue.name());
        // Links back to the seed resolve to the serialized form.
        queue.mark_seen(&seed);

        if let Err(e) = self.index_page(&seed, &site, &queue).await {
            tracing::error!("Seed page {} failed: {}", seed, e);
            queue.transition(JobState::Failed)?;
            return Err(e);
        }

        queue.transition(JobState::Indexed)?;

        let crawler = self.clone();
        Ok(tokio::spawn(async move {
            crawler.process_pages(queue, site).await;
        }))
    }

    /// Fetches, stores and indexes one page, then queues its same-site links
    ///
    /// The store is written on the blocking pool so a large index batch does
    /// not stall the runtime.
    ///
    /// # Returns
    ///
    /// The number of links that were new to the job.
    pub async fn index_page(
        &self,
        url: &str,
        site: &str,
        queue: &Queue,
    ) -> Result<usize, KensakuError> {
        let body = self.fetcher.fetch(url).await?;
        tracing::info!("Indexing: {}", url);

        let page = parse_page(&body);
        let document = Document::new(url, site, page.title, page.content);
        let entries = index::index(&document.content, &document.id);
        let words = entries.len();

        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || {
            let mut storage = storage.lock().unwrap_or_else(PoisonError::into_inner);
            storage.put_document(&document)?;
            storage.put_index_entries(&entries)
        })
        .await??;

        let mut queued = 0;
        for link in &page.links {
            match process_url(link, site) {
                Ok(absolute) => {
                    if queue.enqueue(&absolute) {
                        queued += 1;
                    }
                }
                Err(e) => tracing::debug!("Skipping link {}: {}", link, e),
            }
        }

        tracing::debug!(
            "Stored {} ({} words, {} new links)",
            url,
            words,
            queued
        );

        Ok(queued)
    }

    /// Drains the queue, one page per politeness interval
    ///
    /// Page failures are logged and skipped; the job always ends `Finished`.
    async fn process_pages(&self, queue: Arc<Queue>, site: String) {
        if let Err(e) = queue.transition(JobState::Processing) {
            tracing::error!("Job {} cannot start processing: {}", queue.name(), e);
            return;
        }

        let mut pages = 0usize;
        while let Ok(url) = queue.dequeue() {
            match self.index_page(&url, &site, &queue).await {
                Ok(_) => pages += 1,
                Err(e) => tracing::warn!("Skipping {}: {}", url, e),
            }

            if !queue.is_empty() {
                tokio::time::sleep(self.politeness_delay).await;
            }
        }

        if let Err(e) = queue.transition(JobState::Finished) {
            tracing::error!("Job {} could not finish: {}", queue.name(), e);
            return;
        }

        tracing::info!(
            "Crawl of {} finished: {} pages indexed after the seed, {} URLs seen",
            site,
            pages,
            queue.seen_count()
        );
    }
}
