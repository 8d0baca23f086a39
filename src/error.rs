use thiserror::Error;

/// Errors surfaced by the matching engine.
///
/// Missing or inconsistent data never raises an error; lookups degrade to
/// `None`/empty results instead. The only hard failure is rejecting an
/// option value the host handed us that names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchupError {
    /// A host-supplied option string named no known variant.
    #[error("invalid option: {0}")]
    InvalidOption(String),
}
