use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Role;

/// Session file name in data directory
const SESSION_FILE: &str = "session.json";

/// Session expiry time in hours.
/// Warehouse shifts run long; 12 hours keeps one login per shift.
const SESSION_EXPIRY_HOURS: i64 = 12;

/// The authenticated operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn is_expired(&self) -> bool {
        let expiry = self.created_at + Duration::hours(SESSION_EXPIRY_HOURS);
        Utc::now() > expiry
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Disk-backed session: survives restarts until it expires or the
/// operator logs out.
pub struct Session {
    data_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            data: None,
        }
    }

    /// Load session from disk. Expired sessions are treated as absent.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read session file")?;
            let data: SessionData = serde_json::from_str(&contents)
                .context("Failed to parse session file")?;

            if !data.is_expired() {
                self.data = Some(data);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Clear session data
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Update session with new data
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Display name of the logged-in operator, if any
    pub fn display_name(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.display_name.as_str())
    }

    /// Operator id if session exists
    pub fn user_id(&self) -> Option<i64> {
        self.data.as_ref().map(|d| d.user_id)
    }

    /// Check if session is valid (exists and not expired)
    pub fn is_valid(&self) -> bool {
        self.data.as_ref().map(|d| !d.is_expired()).unwrap_or(false)
    }

    /// Whether the logged-in operator has the admin role
    pub fn is_admin(&self) -> bool {
        self.data.as_ref().map(|d| d.is_admin()).unwrap_or(false)
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_data() -> SessionData {
        SessionData {
            user_id: 1,
            username: "admin".to_string(),
            display_name: "Administrator".to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = Session::new(dir.path().to_path_buf());
        session.update(session_data());
        session.save().expect("save session");

        let mut restored = Session::new(dir.path().to_path_buf());
        assert!(restored.load().expect("load session"));
        assert!(restored.is_valid());
        assert!(restored.is_admin());
        assert_eq!(restored.display_name(), Some("Administrator"));
    }

    #[test]
    fn test_expired_session_not_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = Session::new(dir.path().to_path_buf());
        let mut data = session_data();
        data.created_at = Utc::now() - Duration::hours(SESSION_EXPIRY_HOURS + 1);
        session.update(data);
        session.save().expect("save session");

        let mut restored = Session::new(dir.path().to_path_buf());
        assert!(!restored.load().expect("load session"));
        assert!(!restored.is_valid());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = Session::new(dir.path().to_path_buf());
        session.update(session_data());
        session.save().expect("save session");

        session.clear().expect("clear session");
        assert!(session.data.is_none());

        let mut restored = Session::new(dir.path().to_path_buf());
        assert!(!restored.load().expect("load session"));
    }
}
