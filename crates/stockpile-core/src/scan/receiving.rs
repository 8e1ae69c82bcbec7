//! Receiving session: turns completed scans into pending incoming lines.
//!
//! Scans are matched against the catalog by exact inventory number.
//! Repeated scans of the same code coalesce into a running quantity per
//! product; submitting the session produces one incoming movement per
//! line.

use chrono::{DateTime, Utc};

use crate::models::{MovementKind, NewMovement, Product};

/// One pending line of the receiving session.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedLine {
    pub product_id: i64,
    pub name: String,
    pub inventory_number: String,
    pub quantity: f64,
    pub scanned_at: DateTime<Utc>,
}

/// What a scan did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The code matched a catalog product; `quantity` is the running total
    /// for that product within this session.
    Matched { name: String, quantity: f64 },
    /// Nothing in the catalog carries this inventory number. The caller
    /// may run the advisory external lookup; this is not an error.
    Unmatched { code: String },
}

/// Pending received quantities for the current scanning session.
#[derive(Debug, Default)]
pub struct ReceivingSession {
    lines: Vec<ReceivedLine>,
}

impl ReceivingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[ReceivedLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_quantity(&self) -> f64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Record a completed scan against the catalog. A match increments the
    /// product's pending quantity by one; the most recently scanned
    /// product moves to the top.
    pub fn record_scan(&mut self, code: &str, products: &[Product]) -> ScanOutcome {
        let Some(product) = products.iter().find(|p| p.inventory_number == code) else {
            return ScanOutcome::Unmatched {
                code: code.to_string(),
            };
        };

        let now = Utc::now();
        if let Some(pos) = self.lines.iter().position(|l| l.inventory_number == code) {
            let mut line = self.lines.remove(pos);
            line.quantity += 1.0;
            line.scanned_at = now;
            let quantity = line.quantity;
            self.lines.insert(0, line);
            ScanOutcome::Matched {
                name: product.name.clone(),
                quantity,
            }
        } else {
            self.lines.insert(
                0,
                ReceivedLine {
                    product_id: product.id,
                    name: product.name.clone(),
                    inventory_number: product.inventory_number.clone(),
                    quantity: 1.0,
                    scanned_at: now,
                },
            );
            ScanOutcome::Matched {
                name: product.name.clone(),
                quantity: 1.0,
            }
        }
    }

    /// Set a line's quantity directly. Zero or below removes the line.
    pub fn set_quantity(&mut self, inventory_number: &str, quantity: f64) {
        if quantity <= 0.0 {
            self.remove(inventory_number);
        } else if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.inventory_number == inventory_number)
        {
            line.quantity = quantity;
        }
    }

    pub fn adjust_quantity(&mut self, inventory_number: &str, delta: f64) {
        let current = self
            .lines
            .iter()
            .find(|l| l.inventory_number == inventory_number)
            .map(|l| l.quantity);
        if let Some(current) = current {
            self.set_quantity(inventory_number, current + delta);
        }
    }

    pub fn remove(&mut self, inventory_number: &str) {
        self.lines.retain(|l| l.inventory_number != inventory_number);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Convert the pending lines into incoming movements and empty the
    /// session.
    pub fn drain_movements(&mut self, user_name: &str) -> Vec<NewMovement> {
        self.lines
            .drain(..)
            .map(|line| NewMovement {
                product_id: line.product_id,
                movement_type: MovementKind::Incoming,
                quantity: line.quantity,
                user_name: user_name.to_string(),
                supplier: None,
                reason: None,
                notes: None,
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Product> {
        vec![
            Product {
                id: 1,
                name: "Laptop Dell XPS 15".to_string(),
                inventory_number: "LT-001".to_string(),
                quantity: 45.0,
                min_stock: 20.0,
                price: 899.0,
                batch: None,
                unit: None,
            },
            Product {
                id: 2,
                name: "Keyboard Logitech MX".to_string(),
                inventory_number: "KB-002".to_string(),
                quantity: 8.0,
                min_stock: 15.0,
                price: 125.0,
                batch: None,
                unit: None,
            },
        ]
    }

    #[test]
    fn test_repeated_scans_coalesce() {
        let products = catalog();
        let mut session = ReceivingSession::new();

        session.record_scan("LT-001", &products);
        session.record_scan("KB-002", &products);
        let outcome = session.record_scan("LT-001", &products);

        assert_eq!(
            outcome,
            ScanOutcome::Matched {
                name: "Laptop Dell XPS 15".to_string(),
                quantity: 2.0
            }
        );
        assert_eq!(session.lines().len(), 2);
        // Most recent scan sits on top
        assert_eq!(session.lines()[0].inventory_number, "LT-001");
        assert!((session.total_quantity() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unmatched_code() {
        let products = catalog();
        let mut session = ReceivingSession::new();

        let outcome = session.record_scan("ZZ-999", &products);
        assert_eq!(
            outcome,
            ScanOutcome::Unmatched {
                code: "ZZ-999".to_string()
            }
        );
        assert!(session.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let products = catalog();
        let mut session = ReceivingSession::new();
        session.record_scan("LT-001", &products);

        session.set_quantity("LT-001", 0.0);
        assert!(session.is_empty());
    }

    #[test]
    fn test_adjust_quantity() {
        let products = catalog();
        let mut session = ReceivingSession::new();
        session.record_scan("KB-002", &products);

        session.adjust_quantity("KB-002", 4.0);
        assert!((session.lines()[0].quantity - 5.0).abs() < f64::EPSILON);

        session.adjust_quantity("KB-002", -5.0);
        assert!(session.is_empty());
    }

    #[test]
    fn test_drain_movements() {
        let products = catalog();
        let mut session = ReceivingSession::new();
        session.record_scan("LT-001", &products);
        session.record_scan("LT-001", &products);
        session.record_scan("KB-002", &products);

        let movements = session.drain_movements("clerk");
        assert!(session.is_empty());
        assert_eq!(movements.len(), 2);
        assert!(movements
            .iter()
            .all(|m| m.movement_type == MovementKind::Incoming && m.user_name == "clerk"));
        let laptop = movements.iter().find(|m| m.product_id == 1).expect("laptop line");
        assert!((laptop.quantity - 2.0).abs() < f64::EPSILON);
    }
}
