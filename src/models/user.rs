//! User Model
//!
//! Core user data structures and type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The protected root identity. This user can never be modified or deleted,
/// not even by an administrator.
pub const ROOT_USER_ID: i64 = 1;

/// User representation for external API responses
///
/// This struct represents a user profile without the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique identifier for the user
    pub id: i64,

    /// User's display name
    pub name: String,

    /// User's email address (unique, normalized)
    pub email: String,

    /// Role flag: administrators have blanket read/mutate rights
    pub is_admin: bool,

    /// Timestamp when the user account was created
    pub created_at: DateTime<Utc>,
}

/// Internal user representation including password hash
///
/// Used for database operations that need the stored hash. Never exposed in
/// API responses.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserWithPassword {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserWithPassword> for User {
    /// Strips the password hash so it cannot leak into a response body.
    fn from(row: UserWithPassword) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            is_admin: row.is_admin,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_with_password_conversion() {
        let row = UserWithPassword {
            id: 2,
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hashed_password".to_string(),
            is_admin: false,
            created_at: Utc::now(),
        };

        let user: User = row.into();

        assert_eq!(user.id, 2);
        assert_eq!(user.name, "Test User");
        assert_eq!(user.email, "test@example.com");
        assert!(!user.is_admin);
    }
}
