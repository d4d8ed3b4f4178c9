//! Canonical random identifier.

use crate::{UidError, UidResult};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// A random identifier in canonical form (32 lowercase hex characters, no hyphens).
///
/// Once constructed, the contained value is guaranteed canonical, so its `Display` output can be
/// handed to the presentation layer and parsed back with [`Uid::parse`] without loss.
///
/// # Construction
/// - [`Uid::new`] allocates a fresh identifier.
/// - [`Uid::parse`] validates an externally supplied identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uid(Uuid);

impl Default for Uid {
    fn default() -> Self {
        Self::new()
    }
}

impl Uid {
    /// Allocates a new random identifier.
    ///
    /// The only side effect is consumption of the system randomness source.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// Hyphenated or uppercase UUID spellings are rejected, not normalised.
    ///
    /// # Errors
    ///
    /// Returns [`UidError::InvalidInput`] if `input` is not canonical.
    pub fn parse(input: &str) -> UidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UidError::InvalidInput(format!(
                "identifier must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UidError::InvalidInput(e.to_string()))
    }

    /// Returns true if `input` is in canonical form.
    ///
    /// Purely syntactic: exactly 32 bytes of `0-9a-f`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for Uid {
    type Err = UidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uid::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Uid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Uid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Uid::parse(&s).map_err(serde::de::Error::custom)
    }
}
