//! Data models for warehouse entities.
//!
//! This module contains all the data structures used to represent
//! warehouse data including:
//!
//! - `Product`: catalog items with stock levels and the derived `StockStatus`
//! - `Movement`: stock-in/stock-out operations
//! - `User`: operators and their roles
//! - `WriteOffAct`: write-off accounting documents
//! - `BarcodeInfo`: advisory external barcode lookup results

pub mod barcode;
pub mod movement;
pub mod product;
pub mod user;
pub mod writeoff;

pub use barcode::BarcodeInfo;
pub use movement::{Movement, MovementKind, MovementRecord, MovementsResponse, NewMovement};
pub use product::{Product, ProductsResponse, StockStatus};
pub use user::{Role, User, UsersResponse};
pub use writeoff::{ActItem, ActsResponse, WriteOffAct};
