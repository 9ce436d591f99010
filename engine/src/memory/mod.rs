//! Conversation Memory
//!
//! Bounded, ordered log of role-tagged exchanges. Entries are kept oldest
//! first; after every append the log is trimmed from the front until it fits
//! the configured window. Trimming is purely by recency, so a burst of entries
//! from one role can evict every entry of the other.

use sdk::types::Role;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::debug;

/// Default window size in entries
pub const DEFAULT_MEMORY_WINDOW: usize = 12;

/// Summary returned while the memory holds no entries
pub const EMPTY_SUMMARY: &str = "conversation just started";

/// A single recorded exchange
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEntry {
    pub role: Role,
    pub text: String,
    pub timestamp: Instant,
}

/// Recency-bounded conversation log
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    entries: VecDeque<MemoryEntry>,
    limit: usize,
}

impl ConversationMemory {
    /// Create a memory that retains at most `limit` entries.
    ///
    /// A zero limit is raised to one so the most recent entry always survives.
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit + 1),
            limit,
        }
    }

    /// Record an entry stamped with the current instant, then evict the
    /// oldest entries until the window fits.
    pub fn append(&mut self, role: Role, text: impl Into<String>) {
        self.entries.push_back(MemoryEntry {
            role,
            text: text.into(),
            timestamp: Instant::now(),
        });

        let mut evicted = 0usize;
        while self.entries.len() > self.limit {
            self.entries.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            debug!(evicted, limit = self.limit, "Trimmed conversation memory");
        }
    }

    /// Copy of the current entries, oldest first
    pub fn snapshot(&self) -> Vec<MemoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Render every entry as `[role] text`, one per line, in chronological order.
    pub fn summarize(&self) -> String {
        if self.entries.is_empty() {
            return EMPTY_SUMMARY.to_string();
        }

        self.entries
            .iter()
            .map(|entry| format!("[{}] {}", entry.role, entry.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_MEMORY_WINDOW)
    }
}

/// Cloneable handle to the one memory a workflow owns.
///
/// Each operation takes the lock only for its own duration, so a tool handler
/// may read the memory through its context while an invocation is running.
#[derive(Debug, Clone, Default)]
pub struct SharedMemory {
    inner: Arc<Mutex<ConversationMemory>>,
}

impl SharedMemory {
    pub fn new(memory: ConversationMemory) -> Self {
        Self {
            inner: Arc::new(Mutex::new(memory)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConversationMemory> {
        // The memory has no invariant a panicking reader could break
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, role: Role, text: impl Into<String>) {
        self.lock().append(role, text);
    }

    pub fn snapshot(&self) -> Vec<MemoryEntry> {
        self.lock().snapshot()
    }

    pub fn summarize(&self) -> String {
        self.lock().summarize()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn limit(&self) -> usize {
        self.lock().limit()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
