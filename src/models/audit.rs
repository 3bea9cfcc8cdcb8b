//! Audit Ledger Model
//!
//! One append-only ledger covers every entity. The application only ever
//! inserts rows; nothing updates or deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of entity an audit entry or authorization decision refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Place,
    Review,
    Favorite,
    Visited,
}

impl EntityKind {
    /// String form stored in the ledger
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Place => "place",
            EntityKind::Review => "review",
            EntityKind::Favorite => "favorite",
            EntityKind::Visited => "visited",
        }
    }
}

/// What happened to the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    /// A creation attempt that was rejected (e.g. duplicate registration);
    /// recorded with a null actor so failed attempts stay traceable.
    CreateError,
}

impl AuditAction {
    /// String form stored in the ledger
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::CreateError => "create_error",
        }
    }
}

/// A ledger row joined with the actor's display name for the admin view
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HistoryEntry {
    pub id: i64,
    pub entity_type: String,
    pub entity_id: String,
    pub actor_id: Option<i64>,
    pub action: String,
    pub created_at: DateTime<Utc>,
    /// Display name of the acting user, if that user still exists
    pub actor_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_strings() {
        assert_eq!(EntityKind::User.as_str(), "user");
        assert_eq!(EntityKind::Visited.as_str(), "visited");
    }

    #[test]
    fn test_audit_action_strings() {
        assert_eq!(AuditAction::Create.as_str(), "create");
        assert_eq!(AuditAction::CreateError.as_str(), "create_error");
    }
}
