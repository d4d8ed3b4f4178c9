//! Text and JSON output for the CLI.

use splitsnap_core::{format_currency, CoreConfig, Item, ParsedLine, Session};

const NAME_WIDTH: usize = 32;

pub fn print_parsed(lines: &[ParsedLine], config: &CoreConfig) {
    if lines.is_empty() {
        println!("No items found.");
        return;
    }
    for line in lines {
        println!(
            "{:<NAME_WIDTH$} {:>10}",
            line.name,
            format_currency(line.price, config.currency_symbol())
        );
    }
}

pub fn print_items(items: &[Item], config: &CoreConfig) {
    if items.is_empty() {
        println!("No items found.");
        return;
    }
    for item in items {
        println!(
            "{:<NAME_WIDTH$} {:>10}",
            item.name(),
            format_currency(item.price(), config.currency_symbol())
        );
    }
}

pub fn print_split(session: &Session, config: &CoreConfig) {
    let symbol = config.currency_symbol();

    if session.needs_more_people() {
        println!("(add at least 2 people to split the bill)");
    }

    for summary in session.summaries() {
        println!(
            "{:<NAME_WIDTH$} {:>10}",
            summary.person.name(),
            format_currency(summary.total, symbol)
        );
        if summary.is_empty() {
            println!("  no items assigned yet");
        }
        for line in &summary.individual_items {
            println!(
                "  {:<width$} {:>10}",
                line.name,
                format_currency(line.price, symbol),
                width = NAME_WIDTH - 2
            );
        }
        for line in &summary.shared_items {
            let label = format!(
                "{} (shared {})",
                line.name,
                format_currency(line.full_price, symbol)
            );
            println!(
                "  {:<width$} {:>10}",
                label,
                format_currency(line.share, symbol),
                width = NAME_WIDTH - 2
            );
        }
    }

    let totals = session.totals();
    println!();
    println!(
        "{:<NAME_WIDTH$} {:>10}",
        "Grand total",
        format_currency(totals.grand_total, symbol)
    );
    println!(
        "{:<NAME_WIDTH$} {:>10}",
        "Assigned",
        format_currency(totals.assigned_total, symbol)
    );
    println!(
        "{:<NAME_WIDTH$} {:>10}",
        "Unassigned",
        format_currency(totals.unassigned(), symbol)
    );
    if totals.has_unassigned() {
        println!("(some items are not assigned to anyone yet)");
    }
}

pub fn session_json(session: &Session) -> serde_json::Result<String> {
    let totals = session.totals();
    serde_json::to_string_pretty(&serde_json::json!({
        "items": session.items(),
        "people": session.people(),
        "summaries": session.summaries(),
        "totals": {
            "grand_total": totals.grand_total,
            "assigned_total": totals.assigned_total,
            "unassigned": totals.unassigned(),
            "has_unassigned": totals.has_unassigned(),
        },
    }))
}
