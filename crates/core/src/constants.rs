//! Constants used throughout the SplitSnap core crate.

/// Number of display colours people cycle through (colour indices are `1..=PALETTE_SIZE`).
pub const PALETTE_SIZE: u8 = 8;

/// Currency symbol used when formatting amounts and no override is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Executable name of the tesseract OCR program.
pub const DEFAULT_TESSERACT_BIN: &str = "tesseract";

/// Tesseract language pack used for receipts.
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// Below this head count the split is not meaningful yet.
pub const MIN_PEOPLE_FOR_SPLIT: usize = 2;

/// Upper bound for reported scan progress.
pub const PROGRESS_MAX: u8 = 100;

/// Smallest amount the split reports as money left over.
pub const CENT: f64 = 0.01;

/// Unassigned differences below this are float residue, not money.
pub const UNASSIGNED_TOLERANCE: f64 = 0.005;
