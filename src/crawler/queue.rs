//! Work queue shared by the orchestrator and the workers
//!
//! This module handles:
//! - FIFO hand-off of pending links (unbounded)
//! - Counting items produced but not yet marked done
//! - Waking the orchestrator once that count drops to zero

use crate::crawler::Link;
use crate::CartographerError;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{mpsc, Mutex, Notify};

/// Unbounded FIFO of pending links with completion tracking
///
/// Every `produce` must eventually be matched by exactly one `mark_done`.
/// The crawl is finished when the outstanding count reaches zero: workers
/// produce a page's children before marking the page done, so the count can
/// only hit zero once no further work can appear.
pub struct WorkQueue {
    sender: mpsc::UnboundedSender<Link>,
    receiver: Mutex<mpsc::UnboundedReceiver<Link>>,
    outstanding: AtomicUsize,
    drained: Notify,
}

impl WorkQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
            outstanding: AtomicUsize::new(0),
            drained: Notify::new(),
        }
    }

    /// Appends `link` and counts it as outstanding
    pub fn produce(&self, link: Link) -> Result<(), CartographerError> {
        tracing::debug!("Added to the queue: {} (depth {})", link, link.depth());

        // Count before sending so a fast consumer can never mark it done first
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        if let Err(rejected) = self.sender.send(link) {
            self.outstanding.fetch_sub(1, Ordering::AcqRel);
            return Err(CartographerError::InvariantViolation(format!(
                "work queue closed while producing {}",
                rejected.0
            )));
        }
        Ok(())
    }

    /// Waits for the next link
    ///
    /// Cancel-safe: dropping the returned future never loses a link.
    pub async fn consume(&self) -> Result<Link, CartographerError> {
        let mut receiver = self.receiver.lock().await;
        receiver.recv().await.ok_or_else(|| {
            CartographerError::InvariantViolation("work queue closed".to_string())
        })
    }

    /// Marks one consumed link as fully processed
    ///
    /// # Errors
    ///
    /// `InvariantViolation` if called more times than links were produced.
    pub fn mark_done(&self) -> Result<(), CartographerError> {
        let previous = self
            .outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .map_err(|_| {
                CartographerError::InvariantViolation(
                    "mark_done called more times than links were produced".to_string(),
                )
            })?;

        if previous == 1 {
            self.drained.notify_waiters();
        }
        Ok(())
    }

    /// Waits until every produced link has been marked done
    ///
    /// Returns immediately if nothing is outstanding.
    pub async fn join(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            // Register before checking so a wake-up between the check and
            // the await is not missed.
            notified.as_mut().enable();

            if self.outstanding.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Number of links produced but not yet marked done
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}
