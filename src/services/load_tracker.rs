//! Last-request-wins bookkeeping for asynchronous loads

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one load request; compared against the tracker when it resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadToken {
    generation: u64,
}

impl LoadToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Issues monotonically increasing load tokens
#[derive(Debug, Default)]
pub struct LoadTracker {
    latest: AtomicU64,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load, superseding every earlier token
    pub fn issue(&self) -> LoadToken {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        LoadToken { generation }
    }

    pub fn is_current(&self, token: LoadToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.generation
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}
