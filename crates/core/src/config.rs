//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the session and the
//! OCR adapter. Nothing in the core reads environment variables while handling user actions.

use crate::constants::{DEFAULT_CURRENCY_SYMBOL, DEFAULT_OCR_LANGUAGE, DEFAULT_TESSERACT_BIN};
use crate::{BillError, BillResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    currency_symbol: String,
    tesseract_bin: PathBuf,
    ocr_language: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.into(),
            tesseract_bin: PathBuf::from(DEFAULT_TESSERACT_BIN),
            ocr_language: DEFAULT_OCR_LANGUAGE.into(),
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        currency_symbol: String,
        tesseract_bin: PathBuf,
        ocr_language: String,
    ) -> BillResult<Self> {
        if tesseract_bin.as_os_str().is_empty() {
            return Err(BillError::InvalidConfig(
                "tesseract binary path cannot be empty".into(),
            ));
        }
        validate_ocr_language(&ocr_language)?;

        Ok(Self {
            currency_symbol,
            tesseract_bin,
            ocr_language,
        })
    }

    /// Build a config from raw, optional values (typically environment variables read by the
    /// binary). Missing or blank values fall back to the defaults.
    pub fn from_env_values(
        currency_symbol: Option<String>,
        tesseract_bin: Option<String>,
        ocr_language: Option<String>,
    ) -> BillResult<Self> {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self::new(
            non_blank(currency_symbol).unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.into()),
            non_blank(tesseract_bin)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TESSERACT_BIN)),
            non_blank(ocr_language).unwrap_or_else(|| DEFAULT_OCR_LANGUAGE.into()),
        )
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    pub fn tesseract_bin(&self) -> &Path {
        &self.tesseract_bin
    }

    pub fn ocr_language(&self) -> &str {
        &self.ocr_language
    }
}

/// Tesseract language specs look like `eng` or `eng+deu`; anything else would end up as a raw
/// command-line argument, so it is refused here.
fn validate_ocr_language(language: &str) -> BillResult<()> {
    if language.is_empty() {
        return Err(BillError::InvalidConfig("OCR language cannot be empty".into()));
    }

    let ok = language
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'+'));
    if !ok {
        return Err(BillError::InvalidConfig(format!(
            "OCR language contains invalid characters: '{}'",
            language
        )));
    }

    Ok(())
}
