//! Delimiter location
//!
//! Picks a single delimiter candidate relative to the cursor: the innermost
//! containing node for `current`, or the nearest candidate in linearized
//! document order for `next`/`prev`. The facade materializes the pick into a
//! [`DelimiterDescriptor`] once scope resolution succeeds.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;
use uuid::Uuid;

use crate::error::MatchupError;
use crate::index::ActiveNodeSet;
use crate::node::{linearize, Point, Side, SymbolKey, SyntaxNode};

/// Search direction relative to the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// A delimiter whose range contains the cursor.
    #[default]
    Current,
    /// The nearest delimiter at or after the cursor.
    Next,
    /// The nearest delimiter at or before the cursor.
    Prev,
}

impl FromStr for Direction {
    type Err = MatchupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(Self::Current),
            "next" => Ok(Self::Next),
            "prev" => Ok(Self::Prev),
            other => Err(MatchupError::InvalidOption(other.to_string())),
        }
    }
}

/// Which delimiter sides a locate request considers.
///
/// Selectors expand to an ordered side list via a fixed table; candidate
/// scans visit sides in exactly that order, which also fixes tie-breaking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideSelector {
    Open,
    Mid,
    Close,
    Both,
    #[default]
    BothAll,
    OpenMid,
}

impl SideSelector {
    /// Expand the selector into its ordered side list.
    pub fn sides(self) -> &'static [Side] {
        match self {
            Self::Open => &[Side::Open],
            Self::Mid => &[Side::Mid],
            Self::Close => &[Side::Close],
            Self::Both => &[Side::Close, Side::Open],
            Self::BothAll => &[Side::Close, Side::Mid, Side::Open],
            Self::OpenMid => &[Side::Mid, Side::Open],
        }
    }
}

impl FromStr for SideSelector {
    type Err = MatchupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "mid" => Ok(Self::Mid),
            "close" => Ok(Self::Close),
            "both" => Ok(Self::Both),
            "both_all" => Ok(Self::BothAll),
            "open_mid" => Ok(Self::OpenMid),
            other => Err(MatchupError::InvalidOption(other.to_string())),
        }
    }
}

/// Options for a locate request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DelimiterOptions {
    pub direction: Direction,
    pub side: SideSelector,
    /// Whether the host intends to highlight the result rather than jump.
    pub highlighting: bool,
}

/// Public result of a locate operation.
///
/// `id` is the only durable handle back to the cached search context; it
/// stays valid until evicted from the match-result cache.
#[derive(Debug, Clone, Serialize)]
pub struct DelimiterDescriptor {
    pub id: Uuid,
    pub side: Side,
    pub key: SymbolKey,
    /// Source text of the delimiter node.
    pub text: String,
    /// 1-based line of the node's start.
    pub line: usize,
    /// 1-based column of the node's start.
    pub column: usize,
    pub highlighting: bool,
}

/// Pick one delimiter candidate from the active node set.
///
/// Sides expand from `options.side` in table order; `suppress_mids` removes
/// the mid side from whatever the selector expanded to. Ties (equal span for
/// `current`, equal distance for `next`/`prev`) keep the first candidate in
/// side-then-discovery order.
pub(crate) fn pick_candidate(
    set: &ActiveNodeSet,
    options: &DelimiterOptions,
    cursor: Point,
    suppress_mids: bool,
) -> Option<(Arc<SyntaxNode>, Side)> {
    let mut best: Option<(Arc<SyntaxNode>, Side, u64)> = None;
    for &side in options.side.sides() {
        if suppress_mids && side == Side::Mid {
            continue;
        }
        for node in set.side(side) {
            let rank = match options.direction {
                Direction::Current => {
                    if !node.contains(cursor) {
                        continue;
                    }
                    // Smallest span favors the innermost nested candidate.
                    node.span()
                }
                Direction::Next | Direction::Prev => {
                    let origin = linearize(cursor);
                    let position = linearize(node.start());
                    let eligible = match options.direction {
                        Direction::Next => position >= origin,
                        _ => position <= origin,
                    };
                    if !eligible {
                        continue;
                    }
                    origin.abs_diff(position)
                }
            };
            if best.as_ref().is_none_or(|(_, _, r)| rank < *r) {
                best = Some((Arc::clone(node), side, rank));
            }
        }
    }
    if best.is_none() {
        trace!(direction = ?options.direction, "no eligible delimiter candidate");
    }
    best.map(|(node, side, _)| (node, side))
}
