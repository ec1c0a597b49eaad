//! Frontier tracking for the crawl
//!
//! The frontier is the set of URLs that have been claimed for processing but
//! not yet finished, plus the set of URLs already finished. Both sets live
//! behind one lock so a claim is a single check-and-insert.

use crate::CartographerError;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct FrontierSets {
    to_visit: HashSet<String>,
    visited: HashSet<String>,
}

/// Owns the to-visit and visited URL sets
///
/// A URL is in at most one of the two sets, and once visited it never
/// becomes claimable again.
#[derive(Debug, Default)]
pub struct FrontierTracker {
    sets: Mutex<FrontierSets>,
}

impl FrontierTracker {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FrontierSets> {
        // Every critical section leaves the sets consistent, so a panic in
        // another holder does not invalidate them.
        self.sets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims `url` for processing
    ///
    /// Returns true and records the URL as to-visit if it was in neither
    /// set. Returns false otherwise; the caller must not enqueue it.
    pub fn try_claim(&self, url: &str) -> bool {
        let mut sets = self.lock();
        if sets.to_visit.contains(url) || sets.visited.contains(url) {
            return false;
        }
        sets.to_visit.insert(url.to_string());
        true
    }

    /// Moves a claimed `url` from to-visit to visited
    ///
    /// # Errors
    ///
    /// `InvariantViolation` if `url` was never claimed or is already visited.
    pub fn mark_visited(&self, url: &str) -> Result<(), CartographerError> {
        let mut sets = self.lock();
        if !sets.to_visit.remove(url) {
            return Err(CartographerError::InvariantViolation(format!(
                "mark_visited on unclaimed URL {}",
                url
            )));
        }
        sets.visited.insert(url.to_string());
        Ok(())
    }

    /// Returns true if `url` is claimed but not yet visited
    pub fn is_pending(&self, url: &str) -> bool {
        self.lock().to_visit.contains(url)
    }

    /// Returns true if `url` has been fully processed
    pub fn is_visited(&self, url: &str) -> bool {
        self.lock().visited.contains(url)
    }

    /// Number of claimed, unfinished URLs
    pub fn pending_count(&self) -> usize {
        self.lock().to_visit.len()
    }

    /// Number of finished URLs
    pub fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }

    /// Verifies that no URL is both pending and visited
    ///
    /// Both sets are read under one lock, so the result is a consistent
    /// snapshot even while workers are claiming and finishing URLs.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` naming the first URL found in both sets.
    pub fn check_disjoint(&self) -> Result<(), CartographerError> {
        let sets = self.lock();
        match sets.to_visit.intersection(&sets.visited).next() {
            Some(url) => Err(CartographerError::InvariantViolation(format!(
                "{} is both pending and visited",
                url
            ))),
            None => Ok(()),
        }
    }

    /// All finished URLs, sorted
    pub fn visited_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.lock().visited.iter().cloned().collect();
        urls.sort();
        urls
    }
}
