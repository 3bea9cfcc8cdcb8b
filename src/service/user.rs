//! User Service Implementation
//!
//! Account registration, credential checks and user CRUD. Every mutation is
//! recorded on the audit ledger after it succeeds; the root identity guard
//! itself lives in the authorization policy, not here.

use sqlx::PgPool;
use thiserror::Error;
use validator::Validate;

use crate::models::audit::{AuditAction, EntityKind};
use crate::models::requests::{AdminUpdateUserRequest, RegisterRequest};
use crate::models::user::{User, UserWithPassword};
use crate::service::audit::AuditService;
use crate::utils::{
    error::AppError,
    security::{hash_password_with_cost, verify_password, DEFAULT_BCRYPT_COST},
    update::FieldUpdates,
    validation::normalize_email,
};

/// Custom error types for the user service
#[derive(Error, Debug)]
pub enum UserServiceError {
    /// User with the specified identifier was not found
    #[error("User not found")]
    UserNotFound,

    /// Attempted to create a user with an email that already exists
    #[error("Email already registered")]
    EmailAlreadyExists,

    /// Invalid login credentials provided
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Input validation failed with detailed error message
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Password hashing operation failed
    #[error("Password hashing error: {0}")]
    HashingError(#[from] bcrypt::BcryptError),
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::UserNotFound => AppError::NotFound("User not found".to_string()),
            UserServiceError::EmailAlreadyExists => {
                AppError::Conflict("Email already registered".to_string())
            }
            UserServiceError::InvalidCredentials => {
                AppError::Authentication("Invalid credentials".to_string())
            }
            UserServiceError::ValidationError(msg) => AppError::Validation(msg),
            UserServiceError::DatabaseError(e) => AppError::Database(e),
            UserServiceError::HashingError(e) => AppError::HashingError(e),
        }
    }
}

/// Result type for user service operations
pub type UserServiceResult<T> = Result<T, UserServiceError>;

const USER_COLUMNS: &str = "id, name, email, password_hash, is_admin, created_at";

/// Core user service providing account management and credential checks
#[derive(Clone)]
pub struct UserService {
    db_pool: PgPool,
    bcrypt_cost: u32,
    audit: AuditService,
}

impl UserService {
    pub fn new(db_pool: PgPool, audit: AuditService) -> Self {
        Self {
            db_pool,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            audit,
        }
    }

    /// Override the bcrypt cost (lower values for tests)
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Register a new account. The first account ever created becomes an
    /// administrator; with serial ids it is also the protected root identity.
    pub async fn register(&self, request: RegisterRequest) -> UserServiceResult<User> {
        request
            .validate()
            .map_err(|e| UserServiceError::ValidationError(format!("Invalid user data: {}", e)))?;

        let normalized_email = normalize_email(&request.email);
        let password_hash = hash_password_with_cost(&request.password, self.bcrypt_cost)?;

        let result = sqlx::query_as::<_, UserWithPassword>(
            "INSERT INTO users (name, email, password_hash, is_admin) \
             VALUES ($1, $2, $3, NOT EXISTS (SELECT 1 FROM users)) \
             RETURNING id, name, email, password_hash, is_admin, created_at",
        )
        .bind(&request.name)
        .bind(&normalized_email)
        .bind(&password_hash)
        .fetch_one(&self.db_pool)
        .await;

        match result {
            Ok(row) => {
                let user: User = row.into();
                self.audit
                    .record_id(EntityKind::User, user.id, Some(user.id), AuditAction::Create)
                    .await;
                Ok(user)
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some("users_email_key") =>
            {
                // Failed attempts stay traceable: entity id is the attempted
                // email, actor is unknown.
                self.audit
                    .record(EntityKind::User, &normalized_email, None, AuditAction::CreateError)
                    .await;
                Err(UserServiceError::EmailAlreadyExists)
            }
            Err(e) => Err(UserServiceError::DatabaseError(e)),
        }
    }

    /// Check credentials and return the matching user
    pub async fn authenticate(&self, email: &str, password: &str) -> UserServiceResult<User> {
        let normalized_email = normalize_email(email);

        let row = sqlx::query_as::<_, UserWithPassword>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(&normalized_email)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(UserServiceError::InvalidCredentials)?;

        if verify_password(password, &row.password_hash)? {
            Ok(row.into())
        } else {
            Err(UserServiceError::InvalidCredentials)
        }
    }

    /// Retrieve a user by id
    pub async fn get_user_by_id(&self, user_id: i64) -> UserServiceResult<User> {
        let row = sqlx::query_as::<_, UserWithPassword>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(UserServiceError::UserNotFound)?;

        Ok(row.into())
    }

    /// List every user profile
    pub async fn list_users(&self) -> UserServiceResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email, is_admin, created_at FROM users ORDER BY id",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(users)
    }

    /// Update a user's display name
    pub async fn update_name(
        &self,
        user_id: i64,
        name: &str,
        actor_id: i64,
    ) -> UserServiceResult<()> {
        let result = sqlx::query("UPDATE users SET name = $2 WHERE id = $1")
            .bind(user_id)
            .bind(name)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(UserServiceError::UserNotFound);
        }

        self.audit
            .record_id(EntityKind::User, user_id, Some(actor_id), AuditAction::Update)
            .await;
        Ok(())
    }

    /// Update a user's email address
    pub async fn update_email(
        &self,
        user_id: i64,
        email: &str,
        actor_id: i64,
    ) -> UserServiceResult<()> {
        let normalized_email = normalize_email(email);

        let result = sqlx::query("UPDATE users SET email = $2 WHERE id = $1")
            .bind(user_id)
            .bind(&normalized_email)
            .execute(&self.db_pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err)
                    if db_err.constraint() == Some("users_email_key") =>
                {
                    UserServiceError::EmailAlreadyExists
                }
                _ => UserServiceError::DatabaseError(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(UserServiceError::UserNotFound);
        }

        self.audit
            .record_id(EntityKind::User, user_id, Some(actor_id), AuditAction::Update)
            .await;
        Ok(())
    }

    /// Update a user's password
    pub async fn update_password(
        &self,
        user_id: i64,
        password: &str,
        actor_id: i64,
    ) -> UserServiceResult<()> {
        let password_hash = hash_password_with_cost(password, self.bcrypt_cost)?;

        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id)
            .bind(&password_hash)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(UserServiceError::UserNotFound);
        }

        self.audit
            .record_id(EntityKind::User, user_id, Some(actor_id), AuditAction::Update)
            .await;
        Ok(())
    }

    /// Admin partial update of any user field; omitted fields are left
    /// unchanged and an empty update set is rejected.
    pub async fn admin_update(
        &self,
        user_id: i64,
        request: AdminUpdateUserRequest,
        actor_id: i64,
    ) -> UserServiceResult<()> {
        request
            .validate()
            .map_err(|e| UserServiceError::ValidationError(format!("Invalid update data: {}", e)))?;

        let password_hash = match &request.password {
            Some(password) => Some(hash_password_with_cost(password, self.bcrypt_cost)?),
            None => None,
        };

        let updates = FieldUpdates::new()
            .set_text("name", request.name)
            .set_text("email", request.email.as_deref().map(normalize_email))
            .set_text("password_hash", password_hash)
            .set_bool("is_admin", request.is_admin);

        let mut query = updates
            .build_update("users", "id", user_id)
            .map_err(|_| UserServiceError::ValidationError("No fields to update".to_string()))?;

        let result = query
            .build()
            .execute(&self.db_pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err)
                    if db_err.constraint() == Some("users_email_key") =>
                {
                    UserServiceError::EmailAlreadyExists
                }
                _ => UserServiceError::DatabaseError(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(UserServiceError::UserNotFound);
        }

        self.audit
            .record_id(EntityKind::User, user_id, Some(actor_id), AuditAction::Update)
            .await;
        Ok(())
    }

    /// Delete a user account
    pub async fn delete_user(&self, user_id: i64, actor_id: i64) -> UserServiceResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(UserServiceError::UserNotFound);
        }

        self.audit
            .record_id(EntityKind::User, user_id, Some(actor_id), AuditAction::Delete)
            .await;
        Ok(())
    }

    /// Database connectivity probe for the health endpoint
    pub async fn health_check(&self) -> UserServiceResult<()> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_email_maps_to_conflict() {
        let err: AppError = UserServiceError::EmailAlreadyExists.into();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_bad_credentials_map_to_authentication() {
        let err: AppError = UserServiceError::InvalidCredentials.into();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[test]
    fn test_missing_user_maps_to_not_found() {
        let err: AppError = UserServiceError::UserNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
