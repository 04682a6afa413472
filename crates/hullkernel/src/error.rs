//! Error taxonomy for hull and Delaunay construction.

use thiserror::Error;

/// Why a construction produced no result.
///
/// A failed construction never yields a partial mesh.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HullError {
    /// Too few points, collinear 3D input, or an unimplemented extrema case.
    /// Reported as-is, never retried.
    #[error("degenerate input: {reason}")]
    DegenerateInput { reason: String },
    /// A null normal, undecidable orientation, or over-claimed ridge that
    /// survived every jiggle retry.
    #[error("numeric degeneracy after {attempts} attempt(s): {reason}")]
    NumericDegeneracy { attempts: usize, reason: String },
    /// Mesh topology contradicts itself; indicates a bug, never retried.
    #[error("internal inconsistency: {reason}")]
    InternalInconsistency { reason: String },
}

impl HullError {
    pub(crate) fn degenerate_input(reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            reason: reason.into(),
        }
    }

    /// Numeric failure inside a single attempt; the retry driver fills in `attempts`.
    pub(crate) fn numeric(reason: impl Into<String>) -> Self {
        Self::NumericDegeneracy {
            attempts: 1,
            reason: reason.into(),
        }
    }

    pub(crate) fn inconsistent(reason: impl Into<String>) -> Self {
        Self::InternalInconsistency {
            reason: reason.into(),
        }
    }

    /// True for failures the jiggle-retry loop may recover from.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NumericDegeneracy { .. })
    }
}
