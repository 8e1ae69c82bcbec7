//! Printable rendering of write-off acts.
//!
//! Produces the fixed-layout text document that goes to the platform's
//! print flow: approval block, header, numbered item table, total and the
//! commission signature lines. Handing the document to a printer is the
//! caller's business.

use std::fmt::Write;

use crate::models::WriteOffAct;

const PAGE_WIDTH: usize = 100;

/// Render a write-off act as a printable plain-text document.
pub fn render_act(act: &WriteOffAct) -> String {
    let mut doc = String::new();

    if let Some(ref approved_by) = act.approved_by {
        let _ = writeln!(doc, "{:>width$}", "Approved by:", width = PAGE_WIDTH);
        let _ = writeln!(doc, "{:>width$}", approved_by, width = PAGE_WIDTH);
        let _ = writeln!(doc, "{:>width$}", "________________", width = PAGE_WIDTH);
        doc.push('\n');
    }

    let title = "WRITE-OFF ACT OF INVENTORY ASSETS";
    let _ = writeln!(doc, "{:^width$}", title, width = PAGE_WIDTH);
    let _ = writeln!(
        doc,
        "{:^width$}",
        format!("No. {} of {}", act.act_number, act.act_date),
        width = PAGE_WIDTH
    );
    doc.push('\n');

    let responsible = act.responsible_person.as_deref().unwrap_or("_________________");
    let _ = writeln!(doc, "Responsible person: {}", responsible);
    let _ = writeln!(doc, "Write-off commission:");
    let members: Vec<&String> = act
        .commission_members
        .iter()
        .filter(|m| !m.trim().is_empty())
        .collect();
    if members.is_empty() {
        let _ = writeln!(doc, "  - _________________");
    } else {
        for member in members {
            let _ = writeln!(doc, "  - {}", member);
        }
    }
    doc.push('\n');

    let _ = writeln!(
        doc,
        "This act certifies that the commission has written off the following inventory assets:"
    );
    doc.push('\n');

    let rule = "-".repeat(PAGE_WIDTH);
    let _ = writeln!(doc, "{}", rule);
    let _ = writeln!(
        doc,
        "{:>3} | {:<28} | {:<12} | {:>8} | {:>10} | {:>10} | {:<14}",
        "No", "Name", "Inv. number", "Qty", "Price", "Amount", "Reason"
    );
    let _ = writeln!(doc, "{}", rule);

    for (idx, item) in act.items.iter().enumerate() {
        let _ = writeln!(
            doc,
            "{:>3} | {:<28} | {:<12} | {:>8} | {:>10.2} | {:>10.2} | {:<14}",
            idx + 1,
            clip(&item.name, 28),
            clip(&item.inventory_number, 12),
            item.quantity,
            item.price,
            item.amount(),
            clip(&item.reason, 14),
        );
    }
    let _ = writeln!(doc, "{}", rule);
    let _ = writeln!(
        doc,
        "{:>width$}",
        format!("Total: {:.2}", act.total_sum()),
        width = PAGE_WIDTH
    );
    doc.push('\n');

    let _ = writeln!(doc, "Signatures:");
    let _ = writeln!(doc, "Responsible person: ____________________  /{}/", responsible);
    for member in act.commission_members.iter().filter(|m| !m.trim().is_empty()) {
        let _ = writeln!(doc, "Commission member:  ____________________  /{}/", member);
    }

    doc
}

fn clip(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActItem;

    fn act() -> WriteOffAct {
        WriteOffAct {
            id: Some(3),
            act_number: "WO-2024-017".to_string(),
            act_date: "2024-10-05".to_string(),
            responsible_person: Some("P. Sidorov".to_string()),
            approved_by: Some("Director I. Ivanov".to_string()),
            commission_members: vec![
                "A. Petrova".to_string(),
                "  ".to_string(),
                "K. Smirnov".to_string(),
            ],
            reason: None,
            items: vec![
                ActItem {
                    name: "Headphones Sony WH-1000XM5".to_string(),
                    inventory_number: "HP-005".to_string(),
                    quantity: 2.0,
                    price: 329.0,
                    reason: "water damage".to_string(),
                },
                ActItem {
                    name: "Keyboard Logitech MX".to_string(),
                    inventory_number: "KB-002".to_string(),
                    quantity: 1.0,
                    price: 125.0,
                    reason: "broken keys".to_string(),
                },
            ],
            created_by: Some("admin".to_string()),
            is_draft: false,
        }
    }

    #[test]
    fn test_render_contains_header_items_and_total() {
        let doc = render_act(&act());

        assert!(doc.contains("WRITE-OFF ACT OF INVENTORY ASSETS"));
        assert!(doc.contains("No. WO-2024-017 of 2024-10-05"));
        assert!(doc.contains("Headphones Sony WH-1000XM5"));
        assert!(doc.contains("KB-002"));
        assert!(doc.contains("Total: 783.00"));
        // Blank commission entries are dropped from the lists
        assert_eq!(doc.matches("Commission member:").count(), 2);
    }

    #[test]
    fn test_render_without_optional_blocks() {
        let mut act = act();
        act.approved_by = None;
        act.responsible_person = None;
        act.commission_members.clear();

        let doc = render_act(&act);
        assert!(!doc.contains("Approved by:"));
        assert!(doc.contains("Responsible person: _________________"));
        assert!(doc.contains("  - _________________"));
    }

    #[test]
    fn test_clip_long_names() {
        let mut act = act();
        act.items[0].name = "An exceptionally long product name that will not fit".to_string();
        let doc = render_act(&act);
        assert!(doc.contains("..."));
    }
}
