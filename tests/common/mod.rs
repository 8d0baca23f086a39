//! Shared mock host for integration tests
//!
//! Implements both collaborator traits over in-memory documents: fixed
//! match records stand in for the query engine, and node text is sliced
//! straight out of the document string.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use url::Url;

use matchup_core::{MatchRecord, Point, QueryDriver, SyntaxNode, SyntaxTreeProvider};

#[derive(Default)]
struct MockDocument {
    text: String,
    revision: u64,
    records: Vec<MatchRecord>,
}

#[derive(Default)]
pub struct MockHost {
    documents: RwLock<HashMap<Url, MockDocument>>,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a document with its text and query results.
    pub fn open(&self, doc: &Url, text: &str, records: Vec<MatchRecord>) {
        self.documents.write().insert(
            doc.clone(),
            MockDocument {
                text: text.to_string(),
                revision: 0,
                records,
            },
        );
    }

    /// Replace a document's text and records, bumping its revision.
    pub fn edit(&self, doc: &Url, text: &str, records: Vec<MatchRecord>) {
        let mut documents = self.documents.write();
        let document = documents.get_mut(doc).expect("document not open");
        document.text = text.to_string();
        document.records = records;
        document.revision += 1;
    }
}

impl QueryDriver for MockHost {
    fn has_rules(&self, doc: &Url) -> bool {
        self.documents.read().contains_key(doc)
    }

    fn matches(&self, doc: &Url) -> Vec<MatchRecord> {
        self.documents
            .read()
            .get(doc)
            .map(|document| document.records.clone())
            .unwrap_or_default()
    }
}

impl SyntaxTreeProvider for MockHost {
    fn is_available(&self, doc: &Url) -> bool {
        self.documents.read().contains_key(doc)
    }

    fn parse(&self, doc: &Url) -> bool {
        self.documents.read().contains_key(doc)
    }

    fn revision(&self, doc: &Url) -> u64 {
        self.documents
            .read()
            .get(doc)
            .map(|document| document.revision)
            .unwrap_or(0)
    }

    fn node_text(&self, doc: &Url, node: &SyntaxNode) -> String {
        let documents = self.documents.read();
        let Some(document) = documents.get(doc) else {
            return String::new();
        };
        let lines: Vec<&str> = document.text.lines().collect();
        let (start, end) = (node.start(), node.end());
        if start.row >= lines.len() {
            return String::new();
        }
        if start.row == end.row {
            return slice_columns(lines[start.row], start.column, end.column).to_string();
        }
        let mut text = String::new();
        text.push_str(slice_columns(lines[start.row], start.column, lines[start.row].len()));
        for row in start.row + 1..end.row.min(lines.len()) {
            text.push('\n');
            text.push_str(lines[row]);
        }
        if end.row < lines.len() {
            text.push('\n');
            text.push_str(slice_columns(lines[end.row], 0, end.column));
        }
        text
    }
}

fn slice_columns(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("")
}

/// Shorthand node constructor for fixtures.
pub fn node(
    id: u64,
    kind: &str,
    start: (usize, usize),
    end: (usize, usize),
    parent: Option<&Arc<SyntaxNode>>,
) -> Arc<SyntaxNode> {
    SyntaxNode::new(
        id,
        kind,
        Point::new(start.0, start.1),
        Point::new(end.0, end.1),
        parent.cloned(),
    )
}

pub fn doc_url(name: &str) -> Url {
    Url::parse(&format!("file:///tmp/{name}")).unwrap()
}
