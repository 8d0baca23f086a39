//! Data model for delimiter matching
//!
//! Defines positions, node identities, the owned syntax-node handle the
//! engine works with, and the tagged match records produced by the host's
//! query driver.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label naming one logical construct instance (e.g. `"if"`).
pub type SymbolKey = String;

/// Row stride used to linearize (row, column) pairs for distance comparisons.
///
/// Assumed upper bound on line length. Columns at or beyond the stride can
/// collide with positions on adjacent rows; this is a documented limitation
/// for pathologically long lines, not silently corrected.
pub(crate) const LINE_STRIDE: u64 = 10_000;

/// A 0-based (row, column) position in a document.
///
/// Ordering is row-major: positions compare by row first, then column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Collapse a position to a single scalar for distance comparisons.
pub(crate) fn linearize(point: Point) -> u64 {
    point.row as u64 * LINE_STRIDE + point.column as u64
}

/// Stable identity of a syntax node.
///
/// Real tree nodes carry a host-provided handle; synthetic range
/// pseudo-nodes (no backing tree node) derive identity from their four
/// range coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// Host-provided identity of a real tree node.
    Tree(u64),
    /// Derived identity of a synthetic range pseudo-node.
    Range { start: Point, end: Point },
}

/// The role of a delimiter within its construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Open,
    Mid,
    Close,
}

/// Owned handle to a node of the parsed tree.
///
/// Nodes are produced by the host's tree provider and referenced from
/// [`MatchRecord`]s; the engine never inspects tree structure beyond the
/// parent chain exposed here. Source text extraction goes through
/// [`SyntaxTreeProvider::node_text`](crate::host::SyntaxTreeProvider::node_text).
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    id: NodeId,
    kind: String,
    start: Point,
    end: Point,
    parent: Option<Arc<SyntaxNode>>,
}

impl SyntaxNode {
    /// Create a handle for a real tree node.
    ///
    /// # Arguments
    /// * `id` - Host-provided stable identity
    /// * `kind` - Node type tag (e.g. `"if_statement"`)
    /// * `start` / `end` - 0-based node range
    /// * `parent` - Enclosing node, `None` for the root
    pub fn new(
        id: u64,
        kind: impl Into<String>,
        start: Point,
        end: Point,
        parent: Option<Arc<SyntaxNode>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::Tree(id),
            kind: kind.into(),
            start,
            end,
            parent,
        })
    }

    /// Create a synthetic range pseudo-node with no backing tree node.
    ///
    /// Identity is derived from the range coordinates, so two synthetic
    /// nodes over the same range are the same node to the engine.
    pub fn synthetic(start: Point, end: Point) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::Range { start, end },
            kind: String::new(),
            start,
            end,
            parent: None,
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn parent(&self) -> Option<&Arc<SyntaxNode>> {
        self.parent.as_ref()
    }

    /// Whether the node's half-open range `[start, end)` contains `point`.
    pub fn contains(&self, point: Point) -> bool {
        self.start <= point && point < self.end
    }

    /// Linearized extent of the node, used to rank nested candidates.
    pub(crate) fn span(&self) -> u64 {
        linearize(self.end).saturating_sub(linearize(self.start))
    }
}

/// One query result: delimiter and scope nodes grouped per symbol key.
///
/// Group iteration order is insertion order (`IndexMap`), so consuming
/// records in engine-result order keeps dedup deterministic.
#[derive(Debug, Clone, Default)]
pub struct MatchRecord {
    pub open: IndexMap<SymbolKey, Arc<SyntaxNode>>,
    pub close: IndexMap<SymbolKey, Arc<SyntaxNode>>,
    pub mid: IndexMap<SymbolKey, Vec<Arc<SyntaxNode>>>,
    pub scope: IndexMap<SymbolKey, Arc<SyntaxNode>>,
}

impl MatchRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_open(mut self, key: impl Into<SymbolKey>, node: Arc<SyntaxNode>) -> Self {
        self.open.insert(key.into(), node);
        self
    }

    pub fn with_close(mut self, key: impl Into<SymbolKey>, node: Arc<SyntaxNode>) -> Self {
        self.close.insert(key.into(), node);
        self
    }

    pub fn with_mid(mut self, key: impl Into<SymbolKey>, node: Arc<SyntaxNode>) -> Self {
        self.mid.entry(key.into()).or_default().push(node);
        self
    }

    pub fn with_scope(mut self, key: impl Into<SymbolKey>, node: Arc<SyntaxNode>) -> Self {
        self.scope.insert(key.into(), node);
        self
    }
}
