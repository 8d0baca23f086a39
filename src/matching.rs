//! Completion of a located construct
//!
//! Given a cached match context, finds every delimiter that completes the
//! construct in the requested direction. Candidates come from the active
//! node set; each must belong to the same construct (same key, same
//! re-resolved scope), lie strictly beyond the original position, and fall
//! inside the scope's row span. A forward search over a construct with no
//! explicit closer is capped by a synthetic entry at the scope's end.

use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use crate::cache::MatchContext;
use crate::host::{QueryDriver, SyntaxTreeProvider};
use crate::index::ActiveNodeSet;
use crate::node::{Point, Side};
use crate::scope::containing_scope;

/// One delimiter completing a construct: source text and 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchingEntry {
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl MatchingEntry {
    fn at(text: String, position: Point) -> Self {
        Self {
            text,
            line: position.row + 1,
            column: position.column + 1,
        }
    }
}

/// Collect, in ascending (line, column) order, the delimiters completing the
/// construct recorded in `context`.
pub(crate) fn find_matching(
    context: &MatchContext,
    set: &ActiveNodeSet,
    driver: &dyn QueryDriver,
    trees: &dyn SyntaxTreeProvider,
    doc: &Url,
    forward: bool,
    suppress_mids: bool,
) -> Vec<MatchingEntry> {
    let sides: &[Side] = match (forward, suppress_mids) {
        (true, false) => &[Side::Mid, Side::Close],
        (true, true) => &[Side::Close],
        (false, false) => &[Side::Mid, Side::Open],
        (false, true) => &[Side::Open],
    };

    let origin = context.position;
    let mut accepted: Vec<(Point, String)> = Vec::new();
    let mut closed = false;
    for &side in sides {
        for node in set.side(side) {
            if node.id() == context.node.id() {
                continue;
            }
            if set.symbol(node.id()) != Some(context.key.as_str()) {
                continue;
            }
            let start = node.start();
            let beyond = if forward { start > origin } else { start < origin };
            if !beyond {
                continue;
            }
            if !context.contains_row(start.row) {
                trace!(row = start.row, "candidate outside scope row span");
                continue;
            }
            // The candidate must resolve to the very scope the original
            // node did, otherwise it belongs to a sibling construct.
            match containing_scope(driver, doc, node, &context.key) {
                Some(scope) if scope.id() == context.scope.id() => {}
                _ => continue,
            }
            if side == Side::Close {
                closed = true;
            }
            accepted.push((start, trees.node_text(doc, node)));
        }
    }

    accepted.sort_by_key(|(position, _)| *position);
    let mut results: Vec<MatchingEntry> = accepted
        .into_iter()
        .map(|(position, text)| MatchingEntry::at(text, position))
        .collect();

    if forward && !closed {
        // No explicit closer: the construct is bounded by its scope's end.
        let end = context.scope.end();
        debug!(key = %context.key, "no close delimiter, appending scope-end fallback");
        results.push(MatchingEntry::at(String::new(), end));
    }
    results
}
