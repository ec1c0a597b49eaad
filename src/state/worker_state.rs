/// Worker state definitions for tracking crawl progress
///
/// Each worker cycles through these states once per dequeued link.
use std::fmt;

/// Represents what a crawl worker is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Waiting on the work queue
    Idle,

    /// Fetching the dequeued page
    Fetching,

    /// Resolving and filtering a candidate link
    Filtering,

    /// Claiming and enqueuing an accepted link
    Enqueuing,

    /// Finishing the dequeued item (mark visited, mark done)
    DoneWithItem,
}

impl WorkerState {
    /// Returns true if the worker may move from `self` to `next`
    ///
    /// A link at the depth limit goes straight from `Idle` to
    /// `DoneWithItem`; a failed fetch goes from `Fetching` to
    /// `DoneWithItem`.
    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        use WorkerState::*;

        matches!(
            (self, next),
            (Idle, Fetching)
                | (Idle, DoneWithItem)
                | (Fetching, Filtering)
                | (Fetching, DoneWithItem)
                | (Filtering, Filtering)
                | (Filtering, Enqueuing)
                | (Filtering, DoneWithItem)
                | (Enqueuing, Filtering)
                | (Enqueuing, DoneWithItem)
                | (DoneWithItem, Idle)
        )
    }

    /// Short lowercase name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Filtering => "filtering",
            Self::Enqueuing => "enqueuing",
            Self::DoneWithItem => "done_with_item",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
