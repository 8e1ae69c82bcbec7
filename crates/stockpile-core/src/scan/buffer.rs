//! Keystroke buffering for hardware barcode scanners.
//!
//! Scanners emulate a keyboard: every character of a code arrives as its
//! own key event in a rapid burst, terminated by Enter. The buffer
//! assembles those bursts into discrete codes and uses a short inactivity
//! window to throw away stray keystrokes that never form a complete scan -
//! human typing is slower than the window and gets rejected by it.

use std::time::{Duration, Instant};

use tracing::debug;

/// Inactivity window delimiting one scan from the next.
/// Scanners emit characters well under 100ms apart; people do not.
pub const SCAN_INACTIVITY: Duration = Duration::from_millis(100);

/// A keyboard event as the buffer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKey {
    /// A single printable character.
    Char(char),
    /// The terminator the scanner sends after the code.
    Enter,
    /// Any multi-character key name (function keys, arrows). Ignored, but
    /// does not disturb an in-progress scan.
    Other,
}

/// Accumulates scanner keystrokes into completed codes.
///
/// One deadline per session: it is cancelled and rearmed together with
/// every accepted keystroke, so no two windows are ever pending at once.
#[derive(Debug)]
pub struct ScanBuffer {
    armed: bool,
    buffer: String,
    deadline: Option<Instant>,
    window: Duration,
}

impl ScanBuffer {
    pub fn new() -> Self {
        Self::with_window(SCAN_INACTIVITY)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            armed: false,
            buffer: String::new(),
            deadline: None,
            window,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Start listening for scanner keystrokes.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Stop listening. Idempotent; discards any in-progress buffer and
    /// cancels the inactivity window.
    pub fn disarm(&mut self) {
        self.armed = false;
        self.buffer.clear();
        self.deadline = None;
    }

    /// Feed one keystroke. Returns the completed code when this keystroke
    /// terminates a scan; the caller handles the code synchronously.
    pub fn handle_key(&mut self, key: ScanKey, now: Instant) -> Option<String> {
        if !self.armed {
            return None;
        }
        self.expire(now);

        match key {
            ScanKey::Char(c) => {
                self.buffer.push(c);
                self.deadline = Some(now + self.window);
                None
            }
            ScanKey::Enter => {
                if self.buffer.is_empty() {
                    None
                } else {
                    self.deadline = None;
                    let code = std::mem::take(&mut self.buffer);
                    debug!(code = %code, "Scan completed");
                    Some(code)
                }
            }
            ScanKey::Other => None,
        }
    }

    /// Let the inactivity window lapse. Call from the event loop so stray
    /// characters are discarded even when no further key arrives.
    pub fn poll(&mut self, now: Instant) {
        if self.armed {
            self.expire(now);
        }
    }

    fn expire(&mut self, now: Instant) {
        if let Some(deadline) = self.deadline {
            if now >= deadline {
                debug!(discarded = self.buffer.len(), "Scan window elapsed");
                self.buffer.clear();
                self.deadline = None;
            }
        }
    }
}

impl Default for ScanBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    fn feed(buffer: &mut ScanBuffer, s: &str, start: Instant, step: Duration) -> Vec<String> {
        let mut completed = Vec::new();
        let mut now = start;
        for c in s.chars() {
            let key = if c == '\n' { ScanKey::Enter } else { ScanKey::Char(c) };
            if let Some(code) = buffer.handle_key(key, now) {
                completed.push(code);
            }
            now += step;
        }
        completed
    }

    #[test]
    fn test_burst_terminated_by_enter_yields_one_code() {
        let mut buffer = ScanBuffer::with_window(WINDOW);
        buffer.arm();

        let codes = feed(&mut buffer, "ABC\n", Instant::now(), Duration::from_millis(50));
        assert_eq!(codes, vec!["ABC".to_string()]);
    }

    #[test]
    fn test_window_elapsed_discards_buffer() {
        let mut buffer = ScanBuffer::with_window(WINDOW);
        buffer.arm();

        let start = Instant::now();
        buffer.handle_key(ScanKey::Char('A'), start);
        buffer.handle_key(ScanKey::Char('B'), start + Duration::from_millis(40));

        // Enter arrives after the window: nothing is emitted and the
        // stale characters are gone.
        let emitted = buffer.handle_key(ScanKey::Enter, start + Duration::from_millis(200));
        assert_eq!(emitted, None);

        // A fresh burst is unaffected by the discarded one
        let codes = feed(&mut buffer, "XY\n", start + Duration::from_millis(300), Duration::from_millis(30));
        assert_eq!(codes, vec!["XY".to_string()]);
    }

    #[test]
    fn test_poll_expires_stray_characters() {
        let mut buffer = ScanBuffer::with_window(WINDOW);
        buffer.arm();

        let start = Instant::now();
        buffer.handle_key(ScanKey::Char('Q'), start);
        buffer.poll(start + Duration::from_millis(150));

        let emitted = buffer.handle_key(ScanKey::Enter, start + Duration::from_millis(160));
        assert_eq!(emitted, None);
    }

    #[test]
    fn test_disarmed_ignores_all_input() {
        let mut buffer = ScanBuffer::with_window(WINDOW);

        let codes = feed(&mut buffer, "ABC\n", Instant::now(), Duration::from_millis(10));
        assert!(codes.is_empty());
    }

    #[test]
    fn test_disarm_is_idempotent_and_discards() {
        let mut buffer = ScanBuffer::with_window(WINDOW);
        buffer.disarm();
        assert!(!buffer.is_armed());

        buffer.arm();
        buffer.handle_key(ScanKey::Char('A'), Instant::now());
        buffer.disarm();
        buffer.disarm();
        assert!(!buffer.is_armed());

        // Rearming starts from an empty buffer
        buffer.arm();
        let emitted = buffer.handle_key(ScanKey::Enter, Instant::now());
        assert_eq!(emitted, None);
    }

    #[test]
    fn test_function_keys_do_not_break_a_burst() {
        let mut buffer = ScanBuffer::with_window(WINDOW);
        buffer.arm();

        let start = Instant::now();
        buffer.handle_key(ScanKey::Char('1'), start);
        buffer.handle_key(ScanKey::Other, start + Duration::from_millis(10));
        buffer.handle_key(ScanKey::Char('2'), start + Duration::from_millis(20));
        let emitted = buffer.handle_key(ScanKey::Enter, start + Duration::from_millis(30));

        assert_eq!(emitted.as_deref(), Some("12"));
    }

    #[test]
    fn test_enter_with_empty_buffer_emits_nothing() {
        let mut buffer = ScanBuffer::with_window(WINDOW);
        buffer.arm();
        assert_eq!(buffer.handle_key(ScanKey::Enter, Instant::now()), None);
    }

    #[test]
    fn test_consecutive_scans() {
        let mut buffer = ScanBuffer::with_window(WINDOW);
        buffer.arm();

        let codes = feed(
            &mut buffer,
            "111\n222\n",
            Instant::now(),
            Duration::from_millis(20),
        );
        assert_eq!(codes, vec!["111".to_string(), "222".to_string()]);
    }
}
