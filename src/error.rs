//! Error types for the integrand library

use thiserror::Error;

/// Main error type for integrand evaluation
///
/// Every failure is local to one integration point or one element; the
/// caller is expected to abandon assembly of the current element only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FEAError {
    #[error("constitutive data requested with no material set")]
    MissingMaterial,

    #[error("invalid element matrix/vector slot configuration: {0}")]
    InvalidSlotIndex(String),

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("unsupported parameter: {0}")]
    UnsupportedParameter(String),
}

/// Result type for integrand operations
pub type FEAResult<T> = Result<T, FEAError>;
