//! Core error types.

use thiserror::Error;

/// Errors raised by the foundation types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// An evidence limit outside the valid `1..=3` range was supplied.
    #[error("Invalid evidence limit: {0} (expected 1-3)")]
    InvalidEvidenceLimit(u8),
}
