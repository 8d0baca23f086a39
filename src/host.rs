//! Collaborator traits implemented by the embedding host
//!
//! The engine never parses source text or evaluates queries itself; both
//! concerns live behind these seams. Implementations are expected to be
//! cheap to call repeatedly: the engine re-reads query matches whenever it
//! needs a fresh view of the document.

use url::Url;

use crate::node::{MatchRecord, SyntaxNode};

/// Query engine collaborator: classifies nodes into open/mid/close/scope
/// groups per symbol key.
pub trait QueryDriver: Send + Sync {
    /// Whether a delimiter ruleset is loaded for this document's language.
    fn has_rules(&self, doc: &Url) -> bool;

    /// Execute the delimiter ruleset against the document's current tree.
    ///
    /// Records must be returned in engine-result order; the engine relies on
    /// that order for deterministic dedup of conflicting tags.
    fn matches(&self, doc: &Url) -> Vec<MatchRecord>;
}

/// Syntax tree collaborator: owns parsing and source text access.
pub trait SyntaxTreeProvider: Send + Sync {
    /// Whether a parser is available for this document.
    fn is_available(&self, doc: &Url) -> bool;

    /// Force a parse of the latest document contents.
    ///
    /// Called before query results are read, so matches can never be stale
    /// relative to the text. Returns `false` if the document cannot be
    /// parsed; the engine then degrades to "nothing to match".
    fn parse(&self, doc: &Url) -> bool;

    /// Monotonic revision counter for the document, bumped on every edit.
    fn revision(&self, doc: &Url) -> u64;

    /// Extract the source text covered by a node.
    ///
    /// Synthetic range pseudo-nodes and out-of-bounds ranges yield an empty
    /// string.
    fn node_text(&self, doc: &Url, node: &SyntaxNode) -> String;
}
