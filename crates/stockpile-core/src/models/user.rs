//! Operator accounts and roles.

use serde::{Deserialize, Serialize};

/// Access role of an operator. Admins may post movements and manage users;
/// regular users get read-only views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::User => "User",
        }
    }
}

/// An operator account as returned by the users endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Response wrapper from the user list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_users_response() {
        let json = r#"{"users": [
            {"id": 1, "username": "admin", "name": "Administrator", "role": "admin",
             "created_at": "2024-01-01T00:00:00"},
            {"id": 2, "username": "clerk", "name": "Warehouse Clerk", "role": "user"}
        ]}"#;

        let resp: UsersResponse = serde_json::from_str(json).expect("parse users");
        assert_eq!(resp.users.len(), 2);
        assert!(resp.users[0].is_admin());
        assert!(!resp.users[1].is_admin());
        assert_eq!(resp.users[1].role.label(), "User");
    }
}
