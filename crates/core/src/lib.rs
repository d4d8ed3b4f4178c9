//! # SplitSnap Core
//!
//! Bill-splitting engine: items, people, assignment rules and the per-person split.
//!
//! This crate contains:
//! - [`receipt`]: best-effort extraction of `(name, price)` lines from OCR text
//! - [`bill`]: pure transitions over item and people collections
//! - [`summary`]: the per-person split and bill-wide totals
//! - [`session`]: the in-memory session that wires user actions and scans together
//! - [`recognizer`]: the OCR boundary and a `tesseract` adapter
//!
//! **No presentation concerns**: rendering, drag-and-drop and argument parsing belong in the
//! `splitsnap-cli` binary or any other front end.

pub mod bill;
pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod receipt;
pub mod recognizer;
pub mod scan;
pub mod session;
pub mod summary;

pub use config::CoreConfig;
pub use error::{BillError, BillResult};
pub use model::{ColorIndex, Item, ItemId, Person, PersonId};
pub use receipt::{parse_price_input, parse_receipt_text, ParsedLine};
pub use recognizer::{RecognitionError, TesseractRecognizer, TextRecognizer};
pub use scan::{ProgressReporter, ScanMonitor, ScanOutcome, ScanState, ScanTicket};
pub use session::Session;
pub use summary::{format_currency, summarize, BillTotals, PersonSummary};
