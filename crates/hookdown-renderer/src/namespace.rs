//! Namespace allocation for cached regions.
//!
//! Every [`CachedRegion`](crate::CachedRegion) stamps its placeholders with a
//! namespace drawn once at construction. Two regions never share a namespace,
//! so their placeholders never collide within one render.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of placeholder namespaces.
///
/// Implementations must never hand out the same value twice.
pub trait NamespaceAllocator: Send + Sync {
    /// Allocate the next unused namespace.
    fn allocate(&self) -> u64;
}

/// Process-wide counter shared by every engine.
static GLOBAL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Allocator backed by a single process-wide counter.
///
/// Values are never reclaimed. Independent engines in one process stay
/// collision-free because they all draw from the same sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalNamespaces;

impl NamespaceAllocator for GlobalNamespaces {
    fn allocate(&self) -> u64 {
        GLOBAL_COUNTER.fetch_add(1, Ordering::Relaxed)
    }
}

/// Allocator with its own counter, for deterministic namespaces in tests.
///
/// # Example
///
/// ```
/// use hookdown_renderer::{NamespaceAllocator, SequentialNamespaces};
///
/// let namespaces = SequentialNamespaces::starting_at(7);
/// assert_eq!(namespaces.allocate(), 7);
/// assert_eq!(namespaces.allocate(), 8);
/// ```
#[derive(Debug, Default)]
pub struct SequentialNamespaces {
    next: AtomicU64,
}

impl SequentialNamespaces {
    /// Create an allocator whose first namespace is `start`.
    #[must_use]
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl NamespaceAllocator for SequentialNamespaces {
    fn allocate(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
