//! Error types for the stackcard domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all stackcard operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Card creation errors ---
    #[error("Card error: {0}")]
    Card(#[from] CardError),

    // --- Composition errors ---
    #[error("Composition error: {0}")]
    Composition(#[from] CompositionError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

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

/// Failure to turn one child config into a mounted card.
///
/// Always recovered locally: the composition mounts an error
/// placeholder at the failing index and carries on.
#[derive(Debug, Clone, Error)]
pub enum CardError {
    #[error("Card config has no 'type' field")]
    MissingType,

    #[error("Unknown card type: {0}")]
    UnknownType(String),

    #[error("Invalid config for '{card_type}' card: {reason}")]
    InvalidConfig { card_type: String, reason: String },

    #[error("Card creation failed for '{card_type}': {reason}")]
    CreationFailed { card_type: String, reason: String },
}

/// Container-level failure outside any single child's path.
///
/// Degrades the whole composition to one error placeholder.
#[derive(Debug, Clone, Error)]
pub enum CompositionError {
    #[error("Invalid grid track specification: {0}")]
    InvalidTracks(String),

    #[error("Container setup failed: {0}")]
    Setup(String),

    #[error("Composition was torn down; create a new instance")]
    TornDown,
}
