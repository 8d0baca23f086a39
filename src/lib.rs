//! Delimiter pairing and navigation engine driven by syntax-tree queries.
//!
//! The engine locates structural delimiters (`if`/`else`/`end`, brackets)
//! near a cursor and finds the delimiters completing the same construct,
//! working from pre-computed query matches supplied by the embedding host.
//! Parsing, query evaluation and editor wiring stay behind the traits in
//! [`host`].

pub mod cache;
pub mod engine;
pub mod error;
pub mod host;
pub mod index;
pub mod locator;
pub mod matching;
pub mod node;
pub mod scope;

pub use cache::{CacheStats, MatchContext, MatchResultCache, DEFAULT_CACHE_CAPACITY};
pub use engine::{MatchupConfig, MatchupEngine};
pub use error::MatchupError;
pub use host::{QueryDriver, SyntaxTreeProvider};
pub use index::{ActiveNodeIndex, ActiveNodeSet};
pub use locator::{DelimiterDescriptor, DelimiterOptions, Direction, SideSelector};
pub use matching::MatchingEntry;
pub use node::{MatchRecord, NodeId, Point, Side, SymbolKey, SyntaxNode};
pub use scope::containing_scope;
