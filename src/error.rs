//! Pipeline-level error types.

use thiserror::Error;

use crate::smiles::SmilesError;
use crate::valence::ValenceError;

/// Sanitization rejected a structure.
///
/// Carries every valence violation found, not just the first, so a
/// failing structure can be diagnosed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("valence validation failed: {}", join_violations(violations))]
pub struct SanitizeError {
    pub violations: Vec<ValenceError>,
}

fn join_violations(violations: &[ValenceError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Why a normalization run failed as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The input line notation could not be parsed into a structure.
    #[error("invalid structure: {0}")]
    InvalidStructure(#[from] SmilesError),
    /// Sanitization rejected the structure, either on input or after
    /// deprotonation mutated it.
    #[error(transparent)]
    Unsanitizable(#[from] SanitizeError),
    /// An identifier operation was invoked on a structure that has not
    /// been sanitized since its last mutation.
    #[error("operation requires a sanitized structure")]
    UnsanitizedStructure,
}
