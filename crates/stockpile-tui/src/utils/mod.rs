//! Utility functions for display formatting.

pub mod format;

pub use format::{format_date, format_money, format_qty, format_signed_qty, truncate_string};
