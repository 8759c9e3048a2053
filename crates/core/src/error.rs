//! Error types for the skybroker domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all skybroker operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Geometry errors ---
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    // --- Pricing errors ---
    #[error("Pricing error: {0}")]
    Price(#[from] PriceError),

    // --- Ledger errors ---
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    // --- Confirmation token errors ---
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Malformed or unusable area-of-interest geometry. Always surfaced to the
/// caller, never silently coerced into something orderable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Invalid WKT polygon: {0}")]
    InvalidWkt(String),

    #[error("Polygon needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),

    #[error("Non-finite coordinate at vertex {index}")]
    NonFiniteCoordinate { index: usize },

    #[error("Polygon has zero area")]
    DegenerateArea,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    #[error("Vendor price must be positive, got {0}")]
    NonPositivePrice(f64),

    #[error("Area must be positive to interpret a price, got {0} km²")]
    NonPositiveArea(f64),
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Confirmation failures. A stale or used token must fail identically on
/// every retry; there is no implicit renewal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("No pending order found for this token")]
    Unknown,

    #[error("This order has expired; create a new one")]
    Expired,

    #[error("This order was already confirmed")]
    AlreadyConfirmed,

    #[error("This order was cancelled")]
    Cancelled,

    #[error("Invalid confirmation code")]
    CodeMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_error_displays_correctly() {
        let err = Error::Geometry(GeometryError::TooFewVertices(2));
        assert!(err.to_string().contains("3 distinct vertices"));
        assert!(err.to_string().contains("2"));
    }

    #[test]
    fn token_error_displays_correctly() {
        let err = Error::Token(TokenError::Expired);
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn ledger_error_displays_correctly() {
        let err = Error::Ledger(LedgerError::Storage("disk full".into()));
        assert!(err.to_string().contains("disk full"));
    }
}
