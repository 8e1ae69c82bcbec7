//! Write-off act documents.
//!
//! A write-off act records the removal of damaged or expired goods from
//! stock, with a commission that signs off on it. Acts live on the
//! write-off endpoint; `crate::report` renders them to a printable form.

use serde::{Deserialize, Serialize};

/// One line of a write-off act.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActItem {
    pub name: String,
    #[serde(alias = "sku")]
    pub inventory_number: String,
    pub quantity: f64,
    pub price: f64,
    #[serde(default)]
    pub reason: String,
}

impl ActItem {
    pub fn amount(&self) -> f64 {
        self.quantity * self.price
    }
}

/// A write-off act document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteOffAct {
    #[serde(default)]
    pub id: Option<i64>,
    pub act_number: String,
    pub act_date: String,
    #[serde(default)]
    pub responsible_person: Option<String>,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub commission_members: Vec<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub items: Vec<ActItem>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
}

impl WriteOffAct {
    pub fn total_sum(&self) -> f64 {
        self.items.iter().map(|i| i.amount()).sum()
    }

    pub fn total_quantity(&self) -> f64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Response wrapper from the write-off act list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ActsResponse {
    pub acts: Vec<WriteOffAct>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_act_and_totals() {
        let json = r#"{"acts": [
            {"id": 3, "act_number": "WO-2024-017", "act_date": "2024-10-05",
             "responsible_person": "P. Sidorov",
             "items": [
                {"name": "Headphones Sony WH-1000XM5", "sku": "HP-005",
                 "quantity": 2, "price": 329.0, "reason": "water damage"},
                {"name": "Keyboard Logitech MX", "inventory_number": "KB-002",
                 "quantity": 1, "price": 125.0, "reason": "broken keys"}
             ],
             "created_by": "admin", "is_draft": false}
        ]}"#;

        let resp: ActsResponse = serde_json::from_str(json).expect("parse acts");
        let act = &resp.acts[0];
        assert_eq!(act.items.len(), 2);
        assert_eq!(act.items[0].inventory_number, "HP-005");
        assert!((act.total_sum() - (2.0 * 329.0 + 125.0)).abs() < 1e-9);
        assert!((act.total_quantity() - 3.0).abs() < f64::EPSILON);
    }
}
