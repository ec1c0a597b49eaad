//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `FrontierTracker`: the claimed and visited URL sets shared by all workers
//! - `WorkerState`: the per-worker state machine (idle, fetching, filtering, ...)

mod frontier;
mod worker_state;

// Re-export main types
pub use frontier::FrontierTracker;
pub use worker_state::WorkerState;
