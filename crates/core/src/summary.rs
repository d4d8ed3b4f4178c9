//! Per-person split computation.
//!
//! [`summarize`] is a pure function of the item and people collections. It is never cached
//! here; the session decides when to re-run it.

use crate::constants::{CENT, UNASSIGNED_TOLERANCE};
use crate::model::{Item, ItemId, Person};
use serde::Serialize;

/// An item charged entirely to one person.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndividualLine {
    pub item_id: ItemId,
    pub name: String,
    pub price: f64,
}

/// A shared item as seen by one person: the full price and that person's equal share.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SharedLine {
    pub item_id: ItemId,
    pub name: String,
    pub full_price: f64,
    pub share: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PersonSummary {
    pub person: Person,
    pub individual_items: Vec<IndividualLine>,
    pub shared_items: Vec<SharedLine>,
    pub total: f64,
}

impl PersonSummary {
    /// Nothing assigned to this person and nothing shared yet.
    pub fn is_empty(&self) -> bool {
        self.individual_items.is_empty() && self.shared_items.is_empty()
    }
}

/// Computes one summary per person, in `people` order.
///
/// - Individual lines: items assigned to the person and not split, in bill order.
/// - Shared lines: every split item, in bill order, each priced at `price / people.len()`.
///   Everyone sees the whole shared pool.
///
/// Items assigned to someone who is not in `people` appear in no summary. With no people the
/// result is empty, so the shared division never runs with a zero divisor.
pub fn summarize(items: &[Item], people: &[Person]) -> Vec<PersonSummary> {
    if people.is_empty() {
        return Vec::new();
    }
    let head_count = people.len() as f64;

    let shared_items: Vec<SharedLine> = items
        .iter()
        .filter(|item| item.is_split())
        .map(|item| SharedLine {
            item_id: item.id(),
            name: item.name().to_string(),
            full_price: item.price(),
            share: item.price() / head_count,
        })
        .collect();
    let shared_total = total_of(shared_items.iter().map(|line| line.share));

    people
        .iter()
        .map(|person| {
            let individual_items: Vec<IndividualLine> = items
                .iter()
                .filter(|item| !item.is_split() && item.assigned_to() == Some(person.id()))
                .map(|item| IndividualLine {
                    item_id: item.id(),
                    name: item.name().to_string(),
                    price: item.price(),
                })
                .collect();
            let individual_total = total_of(individual_items.iter().map(|line| line.price));

            PersonSummary {
                person: person.clone(),
                individual_items,
                shared_items: shared_items.clone(),
                total: individual_total + shared_total,
            }
        })
        .collect()
}

/// Sums from `+0.0` so an empty bill renders as `0.00`, never `-0.00`.
fn total_of(amounts: impl Iterator<Item = f64>) -> f64 {
    amounts.fold(0.0, |acc, amount| acc + amount)
}

/// Bill-wide figures derived alongside the summaries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BillTotals {
    /// Sum of every item price, assigned or not.
    pub grand_total: f64,
    /// Sum of all summary totals.
    pub assigned_total: f64,
}

impl BillTotals {
    pub fn compute(items: &[Item], summaries: &[PersonSummary]) -> Self {
        Self {
            grand_total: total_of(items.iter().map(Item::price)),
            assigned_total: total_of(summaries.iter().map(|summary| summary.total)),
        }
    }

    /// Value nobody is paying for yet. Informational only.
    ///
    /// Differences within half a cent are float residue from shared divisions and read as zero.
    pub fn unassigned(&self) -> f64 {
        let difference = self.grand_total - self.assigned_total;
        if difference.abs() < UNASSIGNED_TOLERANCE {
            0.0
        } else {
            difference
        }
    }

    /// True when more than a cent is left unassigned.
    pub fn has_unassigned(&self) -> bool {
        self.unassigned().abs() > CENT
    }
}

/// Formats an amount with two decimals, e.g. `$12.50`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    format!("{symbol}{amount:.2}")
}
