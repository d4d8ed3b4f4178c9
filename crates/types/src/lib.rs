//! Validated value types shared by the SplitSnap crates.
//!
//! Values of these types can only be built through their checked constructors, so code that
//! holds one never has to re-check emptiness or sign.

use std::fmt;

/// Errors that can occur when creating validated values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// The input text was empty or contained only whitespace
    #[error("label cannot be empty")]
    EmptyLabel,
    /// The amount was zero or negative
    #[error("price must be greater than zero, got {0}")]
    NonPositivePrice(f64),
    /// The amount was NaN or infinite
    #[error("price must be a finite number")]
    NonFinitePrice,
}

/// Display text for an item or person.
///
/// Input is trimmed during construction and must contain at least one non-whitespace
/// character. Duplicates are allowed; a label is not an identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    /// Creates a label from `input`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::EmptyLabel`] if nothing is left after trimming.
    pub fn new(input: impl AsRef<str>) -> Result<Self, ValueError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValueError::EmptyLabel);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for Label {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Label {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Label::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A strictly positive, finite monetary amount.
///
/// Amounts are currency-agnostic and carried as `f64`; two-decimal rounding only happens when
/// an amount is formatted for display.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    /// Creates a price, rejecting NaN, infinities, zero and negative amounts.
    pub fn new(amount: f64) -> Result<Self, ValueError> {
        if !amount.is_finite() {
            return Err(ValueError::NonFinitePrice);
        }
        if amount <= 0.0 {
            return Err(ValueError::NonPositivePrice(amount));
        }
        Ok(Self(amount))
    }

    pub fn amount(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl serde::Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let amount = f64::deserialize(deserializer)?;
        Price::new(amount).map_err(serde::de::Error::custom)
    }
}
