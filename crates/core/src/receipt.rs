//! Receipt text extraction.
//!
//! OCR output is noisy, so this is a best-effort line matcher rather than a receipt grammar:
//! each line either yields one `(name, price)` pair or is dropped. A bad line never fails the
//! whole receipt.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// `<name> <ws> [$] [ws] <digits>.<two digits> [ws]` anchored at end of line.
///
/// The name is lazy but the price is anchored, so when a line holds several price-like tokens
/// the trailing one is the price and everything before it is the name. Names never contain a
/// line terminator (`\r`, U+2028, U+2029); a line with a stray one is dropped. Digits are ASCII
/// only.
static RECEIPT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^\r\n\x{2028}\x{2029}]+?)\s+\$?\s*([0-9]+\.[0-9]{2})\s*$")
        .expect("receipt line pattern is valid")
});

/// A candidate item extracted from receipt text.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParsedLine {
    pub name: String,
    pub price: f64,
}

/// Extracts candidate items from raw receipt text, preserving line order.
pub fn parse_receipt_text(raw: &str) -> Vec<ParsedLine> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<ParsedLine> {
    let captures = RECEIPT_LINE.captures(line)?;
    let name = captures.get(1)?.as_str().trim();
    let price: f64 = captures.get(2)?.as_str().parse().ok()?;

    if name.is_empty() || !price.is_finite() || price <= 0.0 {
        return None;
    }

    Some(ParsedLine {
        name: name.to_string(),
        price,
    })
}

/// Parses a price typed by hand, e.g. `"12.5"` or `"$ 3.00"`.
///
/// Returns `None` unless the result is a positive finite amount.
pub fn parse_price_input(input: &str) -> Option<f64> {
    let digits = input.trim().trim_start_matches('$').trim_start();
    let price: f64 = digits.parse().ok()?;
    (price.is_finite() && price > 0.0).then_some(price)
}
