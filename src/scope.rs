//! Scope resolution
//!
//! Finds the nearest node (including the node itself) registered as a scope
//! for a symbol key by walking the ancestor chain. The scope set is derived
//! fresh from the query matches on every call rather than cached: resolution
//! happens rarely compared to candidate scans, and a stale scope would
//! silently corrupt match results.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::trace;
use url::Url;

use crate::host::QueryDriver;
use crate::node::{NodeId, SyntaxNode};

/// Resolve the smallest enclosing scope of `node` for `key`.
///
/// Walks from `node` itself up through its ancestors and returns the first
/// one registered as a scope under `key`, matching by identity. `None` means
/// the node is orphaned from any construct and cannot be matched.
pub fn containing_scope(
    driver: &dyn QueryDriver,
    doc: &Url,
    node: &Arc<SyntaxNode>,
    key: &str,
) -> Option<Arc<SyntaxNode>> {
    let mut scopes: FxHashSet<NodeId> = FxHashSet::default();
    for record in driver.matches(doc) {
        if let Some(scope) = record.scope.get(key) {
            scopes.insert(scope.id());
        }
    }
    if scopes.is_empty() {
        trace!(key, "no scopes registered for key");
        return None;
    }

    let mut cursor = Some(Arc::clone(node));
    while let Some(current) = cursor {
        if scopes.contains(&current.id()) {
            return Some(current);
        }
        cursor = current.parent().cloned();
    }
    trace!(key, "reached root without finding a scope");
    None
}
