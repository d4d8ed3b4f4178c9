//! Opaque identifiers for bill items and people.
//!
//! Every item and person in a SplitSnap session carries an identifier that is allocated once at
//! creation and never changes. Identifiers are random (UUID v4) and rendered in a *canonical*
//! form: **32 lowercase hexadecimal characters** (no hyphens).
//!
//! This crate provides:
//! - [`Uid`], a wrapper that guarantees the canonical form once constructed.
//! - [`Uid::parse`] for identifiers that arrive from outside the engine (CLI arguments,
//!   presentation callbacks). Non-canonical values are rejected rather than normalised.
//!
//! Uniqueness is probabilistic. Collisions within a session are not detected or repaired.

mod uid;

pub use uid::Uid;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UidResult<T> = Result<T, UidError>;
