//! Advisory barcode lookup result.
//!
//! Produced by the external product-database lookup when a scanned code
//! matches nothing in the local catalog. Purely informational: it helps the
//! operator identify an unknown item and never mutates stock.

/// Identification data for a barcode found in the external product database.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeInfo {
    pub barcode: String,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl BarcodeInfo {
    /// One-line summary for status display.
    pub fn summary(&self) -> String {
        match &self.brand {
            Some(brand) if !brand.is_empty() => format!("{} ({})", self.name, brand),
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_with_and_without_brand() {
        let mut info = BarcodeInfo {
            barcode: "4600000000017".to_string(),
            name: "Sparkling water".to_string(),
            brand: Some("Aqua".to_string()),
            category: None,
            description: None,
            image: None,
        };
        assert_eq!(info.summary(), "Sparkling water (Aqua)");

        info.brand = Some(String::new());
        assert_eq!(info.summary(), "Sparkling water");
    }
}
