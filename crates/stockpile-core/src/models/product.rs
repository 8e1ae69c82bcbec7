//! Product catalog models.
//!
//! `Product` mirrors the product list endpoint payload; `StockStatus` is
//! always derived from the current quantity and minimum-stock threshold,
//! never read off the wire or the cache, so it cannot go stale.

use serde::{Deserialize, Serialize};

/// A catalog item with its current stock level.
///
/// Quantities are fractional (goods sold by weight or length carry
/// non-integer stock).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub inventory_number: String,
    pub quantity: f64,
    pub min_stock: f64,
    pub price: f64,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl Product {
    /// Derived stock status. Computed on every call so it is identical
    /// whether the product came from the network or the offline cache.
    pub fn status(&self) -> StockStatus {
        StockStatus::derive(self.quantity, self.min_stock)
    }

    /// Stock value of this line (quantity x unit price).
    pub fn line_value(&self) -> f64 {
        self.quantity * self.price
    }

    pub fn unit_label(&self) -> &str {
        self.unit.as_deref().unwrap_or("pcs")
    }
}

/// Stock level classification relative to the minimum-stock threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    Critical,
    Low,
    InStock,
}

impl StockStatus {
    /// Classify a quantity against its threshold:
    /// critical at or below half the threshold, low at or below the
    /// threshold, in stock above it.
    pub fn derive(quantity: f64, min_stock: f64) -> Self {
        if quantity <= min_stock / 2.0 {
            StockStatus::Critical
        } else if quantity <= min_stock {
            StockStatus::Low
        } else {
            StockStatus::InStock
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Critical => "critical",
            StockStatus::Low => "low",
            StockStatus::InStock => "in stock",
        }
    }

    pub fn is_below_threshold(&self) -> bool {
        !matches!(self, StockStatus::InStock)
    }
}

/// Response wrapper from the product list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: f64, min_stock: f64) -> Product {
        Product {
            id: 1,
            name: "Test".to_string(),
            inventory_number: "LT-001".to_string(),
            quantity,
            min_stock,
            price: 10.0,
            batch: None,
            unit: None,
        }
    }

    #[test]
    fn test_status_derivation_boundaries() {
        assert_eq!(StockStatus::derive(0.0, 10.0), StockStatus::Critical);
        assert_eq!(StockStatus::derive(5.0, 10.0), StockStatus::Critical);
        assert_eq!(StockStatus::derive(6.0, 10.0), StockStatus::Low);
        assert_eq!(StockStatus::derive(10.0, 10.0), StockStatus::Low);
        assert_eq!(StockStatus::derive(11.0, 10.0), StockStatus::InStock);
    }

    #[test]
    fn test_status_recomputed_from_fields() {
        let mut p = product(20.0, 10.0);
        assert_eq!(p.status(), StockStatus::InStock);
        p.quantity = 3.0;
        assert_eq!(p.status(), StockStatus::Critical);
    }

    #[test]
    fn test_parse_products_response() {
        let json = r#"{"products": [
            {"id": 7, "name": "Laptop Dell XPS 15", "inventory_number": "LT-001",
             "quantity": 45, "min_stock": 20, "price": 899.0, "batch": "2024-09",
             "created_at": "2024-09-01T10:00:00", "updated_at": "2024-10-01T10:00:00"}
        ]}"#;

        let resp: ProductsResponse = serde_json::from_str(json).expect("parse products");
        assert_eq!(resp.products.len(), 1);
        let p = &resp.products[0];
        assert_eq!(p.inventory_number, "LT-001");
        assert_eq!(p.status(), StockStatus::InStock);
        assert!(p.unit.is_none());
        assert_eq!(p.unit_label(), "pcs");
    }

    #[test]
    fn test_line_value() {
        let p = product(4.0, 1.0);
        assert!((p.line_value() - 40.0).abs() < f64::EPSILON);
    }
}
