//! Barcode scanning: keystroke buffering and the receiving session.
//!
//! `ScanBuffer` reassembles rapid scanner keystrokes into discrete codes;
//! `ReceivingSession` accumulates matched codes into pending incoming
//! quantities until the operator posts them as movements.

pub mod buffer;
pub mod receiving;

pub use buffer::{ScanBuffer, ScanKey, SCAN_INACTIVITY};
pub use receiving::{ReceivedLine, ReceivingSession, ScanOutcome};
