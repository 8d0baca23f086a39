//! Bounded cache of match contexts
//!
//! Every descriptor handed to the host is backed by a [`MatchContext`]
//! stored here under the descriptor's id; a later matching search re-reads
//! the context through that id. Entries are evicted least-recently-used
//! once capacity is reached, and a lookup on an unknown id is an ordinary
//! miss, never a failure.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::RwLock;
use url::Url;
use uuid::Uuid;

use crate::node::{Point, SymbolKey, SyntaxNode};

/// Default number of retained match contexts. A tunable default, not a
/// correctness invariant.
pub const DEFAULT_CACHE_CAPACITY: usize = 150;

/// Search context captured when a descriptor is produced.
#[derive(Debug, Clone)]
pub struct MatchContext {
    /// Document the descriptor was produced for.
    pub doc: Url,
    /// The originating delimiter node.
    pub node: Arc<SyntaxNode>,
    /// 0-based start position of the originating node.
    pub position: Point,
    /// Symbol key of the construct.
    pub key: SymbolKey,
    /// Resolved enclosing scope of the originating node.
    pub scope: Arc<SyntaxNode>,
    /// Inclusive row span `[start_row, end_row]` of the scope.
    pub scope_rows: (usize, usize),
}

impl MatchContext {
    /// Whether a row lies inside the scope's row span.
    pub fn contains_row(&self, row: usize) -> bool {
        let (start, end) = self.scope_rows;
        start <= row && row <= end
    }
}

/// Counters for cache behavior, exposed for host diagnostics.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub queries: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

/// LRU map from descriptor id to match context.
#[derive(Debug)]
pub struct MatchResultCache {
    entries: RwLock<LruCache<Uuid, Arc<MatchContext>>>,
    stats: RwLock<CacheStats>,
}

impl MatchResultCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity is at least one");
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            stats: RwLock::new(CacheStats {
                capacity: capacity.get(),
                ..CacheStats::default()
            }),
        }
    }

    /// Look up the context for a descriptor id, marking it recently used.
    pub fn get(&self, id: &Uuid) -> Option<Arc<MatchContext>> {
        let mut entries = self.entries.write();
        let mut stats = self.stats.write();
        stats.queries += 1;
        match entries.get(id) {
            Some(context) => {
                stats.hits += 1;
                Some(Arc::clone(context))
            }
            None => {
                stats.misses += 1;
                None
            }
        }
    }

    /// Store a context, evicting the least recently used entry at capacity.
    pub fn insert(&self, id: Uuid, context: Arc<MatchContext>) {
        let mut entries = self.entries.write();
        let mut stats = self.stats.write();
        if entries.push(id, context).is_some_and(|(evicted, _)| evicted != id) {
            stats.evictions += 1;
        }
        stats.len = entries.len();
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.clear();
        self.stats.write().len = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.read().clone()
    }
}

impl Default for MatchResultCache {
    fn default() -> Self {
        Self::new()
    }
}
