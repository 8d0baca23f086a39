//! Public facade of the matching engine
//!
//! Wires the active node index, scope resolution, delimiter location and the
//! match-result cache behind one struct the host feature layer talks to.
//! All operations degrade to `None`/empty results on missing or
//! inconsistent data; nothing here panics on host input.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::cache::{CacheStats, MatchContext, MatchResultCache, DEFAULT_CACHE_CAPACITY};
use crate::host::{QueryDriver, SyntaxTreeProvider};
use crate::index::ActiveNodeIndex;
use crate::locator::{pick_candidate, DelimiterDescriptor, DelimiterOptions};
use crate::matching::{find_matching, MatchingEntry};
use crate::node::Point;
use crate::scope::containing_scope;

/// Engine configuration, spliced from host settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchupConfig {
    /// Skip mid markers (e.g. `else`, `elseif`) in location and matching.
    pub suppress_mid_markers: bool,
    /// Capacity of the match-result cache.
    pub cache_capacity: usize,
}

impl Default for MatchupConfig {
    fn default() -> Self {
        Self {
            suppress_mid_markers: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Delimiter pairing engine over host-provided query matches.
pub struct MatchupEngine {
    driver: Arc<dyn QueryDriver>,
    trees: Arc<dyn SyntaxTreeProvider>,
    index: ActiveNodeIndex,
    cache: MatchResultCache,
    config: MatchupConfig,
}

impl MatchupEngine {
    pub fn new(driver: Arc<dyn QueryDriver>, trees: Arc<dyn SyntaxTreeProvider>) -> Self {
        Self::with_config(driver, trees, MatchupConfig::default())
    }

    pub fn with_config(
        driver: Arc<dyn QueryDriver>,
        trees: Arc<dyn SyntaxTreeProvider>,
        config: MatchupConfig,
    ) -> Self {
        Self {
            driver,
            trees,
            index: ActiveNodeIndex::new(),
            cache: MatchResultCache::with_capacity(config.cache_capacity),
            config,
        }
    }

    pub fn config(&self) -> &MatchupConfig {
        &self.config
    }

    /// Whether matching is available for a document. False when either the
    /// query driver or the tree provider cannot serve it; every other
    /// operation is then a no-op.
    pub fn is_enabled(&self, doc: &Url) -> bool {
        self.driver.has_rules(doc) && self.trees.is_available(doc)
    }

    /// Locate one delimiter relative to the cursor and cache its search
    /// context under the returned descriptor's id.
    ///
    /// Returns `None` when matching is disabled, no candidate is eligible,
    /// or the chosen node resolves to no enclosing scope — all of which mean
    /// "nothing to match here", not an error.
    pub fn get_delimiter(
        &self,
        doc: &Url,
        cursor: Point,
        options: &DelimiterOptions,
    ) -> Option<DelimiterDescriptor> {
        if !self.is_enabled(doc) {
            debug!(%doc, "matching not enabled for document");
            return None;
        }
        let set = self.index.compute(doc, &*self.trees, &*self.driver)?;
        let (node, side) =
            pick_candidate(&set, options, cursor, self.config.suppress_mid_markers)?;
        let key = set.symbol(node.id())?.to_string();
        let scope = containing_scope(&*self.driver, doc, &node, &key)?;

        let position = node.start();
        let id = Uuid::new_v4();
        let context = MatchContext {
            doc: doc.clone(),
            node: Arc::clone(&node),
            position,
            key: key.clone(),
            scope_rows: (scope.start().row, scope.end().row),
            scope,
        };
        self.cache.insert(id, Arc::new(context));

        Some(DelimiterDescriptor {
            id,
            side,
            key,
            text: self.trees.node_text(doc, &node),
            line: position.row + 1,
            column: position.column + 1,
            highlighting: options.highlighting,
        })
    }

    /// Find the ordered delimiters completing the construct a descriptor was
    /// produced for.
    ///
    /// Empty on a cache miss or when the cached context belongs to another
    /// document (stale or cross-document hit) — both non-fatal.
    pub fn get_matching(&self, id: &Uuid, forward: bool, doc: &Url) -> Vec<MatchingEntry> {
        if !self.is_enabled(doc) {
            return Vec::new();
        }
        let Some(context) = self.cache.get(id) else {
            debug!(%id, "no cached context for descriptor");
            return Vec::new();
        };
        if context.doc != *doc {
            debug!(%id, cached = %context.doc, requested = %doc, "cross-document context, ignoring");
            return Vec::new();
        }
        let Some(set) = self.index.compute(doc, &*self.trees, &*self.driver) else {
            return Vec::new();
        };
        find_matching(
            &context,
            &set,
            &*self.driver,
            &*self.trees,
            doc,
            forward,
            self.config.suppress_mid_markers,
        )
    }

    /// Retire cached state for a document. Called from the host's change or
    /// detach wiring.
    pub fn invalidate(&self, doc: &Url) {
        self.index.invalidate(doc);
    }

    /// Drop all memoized node sets and cached match contexts.
    pub fn clear(&self) {
        self.index.clear();
        self.cache.clear();
    }

    /// Match-result cache counters, for host diagnostics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
