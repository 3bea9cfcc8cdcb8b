//! Authorization Policy
//!
//! The single decision point for who may act on which records. Every handler
//! routes its ownership/role check through [`decide`] instead of re-implementing
//! the comparison inline.
//!
//! Rules, first match wins:
//! 1. Mutations of the root user identity are denied unconditionally,
//!    administrators included.
//! 2. Administrators are allowed everything else.
//! 3. Ownership-scoped actions are allowed when the caller owns the target.
//! 4. Everything else is denied.

use crate::models::{audit::EntityKind, auth::Caller, user::ROOT_USER_ID};
use crate::utils::error::AppError;

/// What the caller is trying to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read rows scoped to the caller's own id
    ReadSelf,
    /// Read rows belonging to arbitrary users
    ReadAny,
    /// Mutate a record the caller claims to own
    MutateOwn,
    /// Mutate any record regardless of owner
    MutateAny,
}

impl Action {
    fn is_mutation(self) -> bool {
        matches!(self, Action::MutateOwn | Action::MutateAny)
    }

    fn requires_ownership(self) -> bool {
        matches!(self, Action::MutateOwn | Action::ReadSelf)
    }
}

/// A denied decision, carrying the reason surfaced as the 403 message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial(pub &'static str);

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        AppError::Forbidden(denial.0.to_string())
    }
}

/// Decide whether `caller` may perform `action` on an entity of `entity` kind
/// owned by `target_owner` (None for role-scoped collection reads).
///
/// Pure function, no side effects. The target owner must be resolved from
/// stored data; a caller-supplied user-id filter never implies authorization.
pub fn decide(
    caller: &Caller,
    entity: EntityKind,
    target_owner: Option<i64>,
    action: Action,
) -> Result<(), Denial> {
    // Rule 1: the root identity is immutable, even for administrators.
    if entity == EntityKind::User
        && action.is_mutation()
        && target_owner == Some(ROOT_USER_ID)
    {
        return Err(Denial("The root user cannot be modified or deleted"));
    }

    // Rule 2: administrators have blanket rights past the root guard.
    if caller.is_admin {
        return Ok(());
    }

    // Rule 3: owners may act on their own records.
    if action.requires_ownership() && target_owner == Some(caller.id) {
        return Ok(());
    }

    // Rule 4.
    Err(Denial("Not authorized"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(id: i64, is_admin: bool) -> Caller {
        Caller {
            id,
            name: "test".to_string(),
            is_admin,
        }
    }

    #[test]
    fn test_root_user_mutation_denied_for_everyone() {
        let admin = caller(5, true);
        let owner = caller(ROOT_USER_ID, false);

        for who in [&admin, &owner] {
            for action in [Action::MutateOwn, Action::MutateAny] {
                let result = decide(who, EntityKind::User, Some(ROOT_USER_ID), action);
                assert!(result.is_err(), "{:?} must not mutate root", action);
            }
        }
    }

    #[test]
    fn test_root_guard_applies_to_user_entity_only() {
        // A review owned by the root user is still manageable by an admin.
        let admin = caller(5, true);
        assert!(decide(&admin, EntityKind::Review, Some(ROOT_USER_ID), Action::MutateAny).is_ok());
    }

    #[test]
    fn test_admin_allowed_reads_and_mutations() {
        let admin = caller(5, true);
        assert!(decide(&admin, EntityKind::User, None, Action::ReadAny).is_ok());
        assert!(decide(&admin, EntityKind::Review, Some(9), Action::MutateOwn).is_ok());
        assert!(decide(&admin, EntityKind::User, Some(9), Action::MutateAny).is_ok());
    }

    #[test]
    fn test_owner_allowed_own_records() {
        let user = caller(7, false);
        assert!(decide(&user, EntityKind::Review, Some(7), Action::MutateOwn).is_ok());
        assert!(decide(&user, EntityKind::Favorite, Some(7), Action::ReadSelf).is_ok());
    }

    #[test]
    fn test_ordinary_caller_denied_foreign_records() {
        let user = caller(7, false);
        assert!(decide(&user, EntityKind::Review, Some(8), Action::MutateOwn).is_err());
        assert!(decide(&user, EntityKind::Favorite, Some(8), Action::ReadSelf).is_err());
        assert!(decide(&user, EntityKind::User, None, Action::ReadAny).is_err());
    }

    #[test]
    fn test_ownership_never_grants_mutate_any() {
        let user = caller(7, false);
        assert!(decide(&user, EntityKind::User, Some(7), Action::MutateAny).is_err());
    }

    #[test]
    fn test_denial_maps_to_forbidden() {
        let user = caller(7, false);
        let err: AppError = decide(&user, EntityKind::User, Some(8), Action::MutateOwn)
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
