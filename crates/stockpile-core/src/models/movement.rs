//! Stock movement models.
//!
//! The movement endpoint reports an unsigned quantity plus a kind; the
//! domain `Movement` carries a signed quantity instead (positive for
//! incoming, negative for outgoing), which is what every consumer wants.

use serde::{Deserialize, Serialize};

/// Kind of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Incoming,
    Outgoing,
}

impl MovementKind {
    pub fn label(&self) -> &'static str {
        match self {
            MovementKind::Incoming => "Incoming",
            MovementKind::Outgoing => "Outgoing",
        }
    }

    fn from_wire(s: &str) -> Self {
        // Anything that is not explicitly incoming reduces stock.
        if s.eq_ignore_ascii_case("incoming") {
            MovementKind::Incoming
        } else {
            MovementKind::Outgoing
        }
    }
}

/// A completed stock movement as the application sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub created_at: String,
    pub product_name: String,
    pub kind: MovementKind,
    /// Signed: positive for incoming, negative for outgoing.
    pub quantity: f64,
    pub user_name: String,
}

impl Movement {
    /// Date portion of the timestamp for list display.
    pub fn date(&self) -> &str {
        let end = self.created_at.len().min(10);
        &self.created_at[..end]
    }
}

/// Raw movement record as returned by the movement list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MovementRecord {
    pub id: Option<i64>,
    pub movement_type: String,
    pub quantity: f64,
    pub user_name: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub product_name: String,
    #[serde(default)]
    pub sku: Option<String>,
}

impl MovementRecord {
    /// Convert to the domain shape, applying the sign to the quantity.
    pub fn to_movement(&self) -> Movement {
        let kind = MovementKind::from_wire(&self.movement_type);
        let quantity = match kind {
            MovementKind::Incoming => self.quantity,
            MovementKind::Outgoing => -self.quantity,
        };
        Movement {
            created_at: self.created_at.clone().unwrap_or_default(),
            product_name: self.product_name.clone(),
            kind,
            quantity,
            user_name: self.user_name.clone(),
        }
    }
}

/// Response wrapper from the movement list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MovementsResponse {
    pub movements: Vec<MovementRecord>,
}

/// Body for creating a movement. The wire quantity is unsigned; the kind
/// carries the direction.
#[derive(Debug, Clone, Serialize)]
pub struct NewMovement {
    pub product_id: i64,
    pub movement_type: MovementKind,
    pub quantity: f64,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movements_and_sign() {
        let json = r#"{"movements": [
            {"id": 1, "movement_type": "incoming", "quantity": 20, "user_name": "I. Ivanov",
             "reason": null, "supplier": "Tech Supply LLC", "notes": "",
             "created_at": "2024-10-03T09:12:00", "product_name": "Laptop Dell XPS 15", "sku": "LT-001"},
            {"id": 2, "movement_type": "outgoing", "quantity": 5, "user_name": "A. Petrova",
             "reason": "defect", "created_at": "2024-10-02T15:40:00",
             "product_name": "Mouse Razer DeathAdder", "sku": "MS-004"}
        ]}"#;

        let resp: MovementsResponse = serde_json::from_str(json).expect("parse movements");
        let movements: Vec<Movement> = resp.movements.iter().map(|m| m.to_movement()).collect();

        assert_eq!(movements[0].kind, MovementKind::Incoming);
        assert!((movements[0].quantity - 20.0).abs() < f64::EPSILON);
        assert_eq!(movements[0].date(), "2024-10-03");

        assert_eq!(movements[1].kind, MovementKind::Outgoing);
        assert!((movements[1].quantity + 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_kind_is_outgoing() {
        let record = MovementRecord {
            id: None,
            movement_type: "writeoff".to_string(),
            quantity: 2.0,
            user_name: "operator".to_string(),
            reason: None,
            supplier: None,
            notes: None,
            created_at: None,
            product_name: "Test".to_string(),
            sku: None,
        };
        let m = record.to_movement();
        assert_eq!(m.kind, MovementKind::Outgoing);
        assert!(m.quantity < 0.0);
    }

    #[test]
    fn test_new_movement_body() {
        let body = NewMovement {
            product_id: 7,
            movement_type: MovementKind::Incoming,
            quantity: 3.0,
            user_name: "operator".to_string(),
            supplier: None,
            reason: None,
            notes: None,
        };
        let json = serde_json::to_value(&body).expect("serialize body");
        assert_eq!(json["movement_type"], "incoming");
        assert!(json.get("supplier").is_none());
    }
}
