//! Active node inventory, memoized per (document, revision)
//!
//! Builds the full set of delimiter-candidate nodes for a document,
//! partitioned by side and tagged with a symbol key. The set is recomputed
//! lazily: a revision bump (or an explicit [`ActiveNodeIndex::invalidate`])
//! retires the memoized set, otherwise repeated computation returns the same
//! shared value.

use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use url::Url;

use crate::host::{QueryDriver, SyntaxTreeProvider};
use crate::node::{NodeId, Side, SymbolKey, SyntaxNode};

/// All delimiter candidates of one document revision.
#[derive(Debug, Default)]
pub struct ActiveNodeSet {
    open: Vec<Arc<SyntaxNode>>,
    mid: Vec<Arc<SyntaxNode>>,
    close: Vec<Arc<SyntaxNode>>,
    symbols: FxHashMap<NodeId, SymbolKey>,
}

impl ActiveNodeSet {
    /// Candidate nodes on one side, in discovery order.
    pub fn side(&self, side: Side) -> &[Arc<SyntaxNode>] {
        match side {
            Side::Open => &self.open,
            Side::Mid => &self.mid,
            Side::Close => &self.close,
        }
    }

    /// Symbol key a node identity was registered under, if any.
    pub fn symbol(&self, id: NodeId) -> Option<&str> {
        self.symbols.get(&id).map(String::as_str)
    }

    /// Whether the revision has no delimiter candidates at all.
    pub fn is_empty(&self) -> bool {
        self.open.is_empty() && self.mid.is_empty() && self.close.is_empty()
    }

    /// Register a node under a key, appending to a side list for delimiter
    /// tags. First occurrence of an identity wins; later conflicting tags
    /// are dropped.
    fn insert(&mut self, side: Option<Side>, key: &str, node: &Arc<SyntaxNode>) {
        let id = node.id();
        if self.symbols.contains_key(&id) {
            trace!(?side, key, "dropping duplicate tag for already-seen node");
            return;
        }
        self.symbols.insert(id, key.to_string());
        match side {
            Some(Side::Open) => self.open.push(Arc::clone(node)),
            Some(Side::Mid) => self.mid.push(Arc::clone(node)),
            Some(Side::Close) => self.close.push(Arc::clone(node)),
            // Scope entries take part in identity dedup but join no side list.
            None => {}
        }
    }
}

/// Per-document memo of [`ActiveNodeSet`]s, keyed by revision.
#[derive(Debug, Default)]
pub struct ActiveNodeIndex {
    memo: DashMap<Url, (u64, Arc<ActiveNodeSet>)>,
}

impl ActiveNodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute (or fetch the memoized) active node set for a document.
    ///
    /// A fresh parse is forced before query results are read, so matches can
    /// never be stale relative to the text. Returns `None` when the document
    /// cannot be parsed.
    pub fn compute(
        &self,
        doc: &Url,
        trees: &dyn SyntaxTreeProvider,
        driver: &dyn QueryDriver,
    ) -> Option<Arc<ActiveNodeSet>> {
        if !trees.parse(doc) {
            debug!(%doc, "parse failed, no active nodes");
            return None;
        }
        let revision = trees.revision(doc);
        if let Some(entry) = self.memo.get(doc) {
            let (memo_revision, set) = entry.value();
            if *memo_revision == revision {
                trace!(%doc, revision, "active node set memo hit");
                return Some(Arc::clone(set));
            }
        }

        let mut set = ActiveNodeSet::default();
        // Records in engine-result order; within a record delimiter groups
        // (open, close, mid) come before scope entries, so a node tagged as
        // both keeps its delimiter tag.
        for record in driver.matches(doc) {
            for (key, node) in &record.open {
                set.insert(Some(Side::Open), key, node);
            }
            for (key, node) in &record.close {
                set.insert(Some(Side::Close), key, node);
            }
            for (key, nodes) in &record.mid {
                for node in nodes {
                    set.insert(Some(Side::Mid), key, node);
                }
            }
            for (key, node) in &record.scope {
                set.insert(None, key, node);
            }
        }
        debug!(
            %doc,
            revision,
            open = set.open.len(),
            mid = set.mid.len(),
            close = set.close.len(),
            "rebuilt active node set"
        );

        let set = Arc::new(set);
        self.memo.insert(doc.clone(), (revision, Arc::clone(&set)));
        Some(set)
    }

    /// Drop the memoized set for a document. Hosts call this from their
    /// change/detach wiring; a revision bump achieves the same implicitly.
    pub fn invalidate(&self, doc: &Url) {
        self.memo.remove(doc);
    }

    /// Drop every memoized set.
    pub fn clear(&self) {
        self.memo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{MatchRecord, Point};
    use parking_lot::Mutex;

    struct FixedHost {
        records: Vec<MatchRecord>,
        revision: Mutex<u64>,
        parses: Mutex<u64>,
        parse_ok: bool,
    }

    impl FixedHost {
        fn new(records: Vec<MatchRecord>) -> Self {
            Self {
                records,
                revision: Mutex::new(0),
                parses: Mutex::new(0),
                parse_ok: true,
            }
        }
    }

    impl QueryDriver for FixedHost {
        fn has_rules(&self, _doc: &Url) -> bool {
            true
        }

        fn matches(&self, _doc: &Url) -> Vec<MatchRecord> {
            self.records.clone()
        }
    }

    impl SyntaxTreeProvider for FixedHost {
        fn is_available(&self, _doc: &Url) -> bool {
            true
        }

        fn parse(&self, _doc: &Url) -> bool {
            *self.parses.lock() += 1;
            self.parse_ok
        }

        fn revision(&self, _doc: &Url) -> u64 {
            *self.revision.lock()
        }

        fn node_text(&self, _doc: &Url, _node: &SyntaxNode) -> String {
            String::new()
        }
    }

    fn doc() -> Url {
        Url::parse("file:///tmp/index.lua").unwrap()
    }

    fn if_end_record() -> MatchRecord {
        let scope = SyntaxNode::new(10, "if_statement", Point::new(0, 0), Point::new(2, 3), None);
        let open = SyntaxNode::new(11, "if", Point::new(0, 0), Point::new(0, 2), Some(scope.clone()));
        let close = SyntaxNode::new(12, "end", Point::new(2, 0), Point::new(2, 3), Some(scope.clone()));
        MatchRecord::new()
            .with_open("if", open)
            .with_close("if", close)
            .with_scope("if", scope)
    }

    #[test]
    fn test_compute_partitions_sides() {
        let host = FixedHost::new(vec![if_end_record()]);
        let index = ActiveNodeIndex::new();
        let set = index.compute(&doc(), &host, &host).unwrap();

        assert_eq!(set.side(Side::Open).len(), 1);
        assert_eq!(set.side(Side::Close).len(), 1);
        assert!(set.side(Side::Mid).is_empty());
        assert!(!set.is_empty());
        assert_eq!(set.symbol(set.side(Side::Open)[0].id()), Some("if"));
    }

    #[test]
    fn test_memoized_per_revision() {
        let host = FixedHost::new(vec![if_end_record()]);
        let index = ActiveNodeIndex::new();
        let first = index.compute(&doc(), &host, &host).unwrap();
        let second = index.compute(&doc(), &host, &host).unwrap();
        assert!(Arc::ptr_eq(&first, &second), "same revision must reuse the set");
        // A fresh parse is still forced on every computation.
        assert_eq!(*host.parses.lock(), 2);

        *host.revision.lock() += 1;
        let third = index.compute(&doc(), &host, &host).unwrap();
        assert!(!Arc::ptr_eq(&first, &third), "revision bump must rebuild");
    }

    #[test]
    fn test_invalidate_drops_memo() {
        let host = FixedHost::new(vec![if_end_record()]);
        let index = ActiveNodeIndex::new();
        let first = index.compute(&doc(), &host, &host).unwrap();
        index.invalidate(&doc());
        let second = index.compute(&doc(), &host, &host).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_first_occurrence_wins_across_records() {
        // The same node identity tagged under two keys in two records: the
        // first record's tag sticks, the later one is dropped.
        let node = SyntaxNode::new(42, "end", Point::new(3, 0), Point::new(3, 3), None);
        let first = MatchRecord::new().with_close("if", node.clone());
        let second = MatchRecord::new().with_open("while", node.clone());
        let host = FixedHost::new(vec![first, second]);

        let index = ActiveNodeIndex::new();
        let set = index.compute(&doc(), &host, &host).unwrap();
        assert_eq!(set.side(Side::Close).len(), 1);
        assert!(set.side(Side::Open).is_empty());
        assert_eq!(set.symbol(node.id()), Some("if"));
    }

    #[test]
    fn test_delimiter_tag_beats_scope_tag_within_record() {
        let node = SyntaxNode::new(7, "do_block", Point::new(0, 0), Point::new(4, 3), None);
        let record = MatchRecord::new()
            .with_open("do", node.clone())
            .with_scope("do", node.clone());
        let host = FixedHost::new(vec![record]);

        let index = ActiveNodeIndex::new();
        let set = index.compute(&doc(), &host, &host).unwrap();
        assert_eq!(set.side(Side::Open).len(), 1, "delimiter tag must survive");
    }

    #[test]
    fn test_parse_failure_yields_none() {
        let mut host = FixedHost::new(vec![if_end_record()]);
        host.parse_ok = false;
        let index = ActiveNodeIndex::new();
        assert!(index.compute(&doc(), &host, &host).is_none());
    }
}
