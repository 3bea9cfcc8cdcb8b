//! Session Token Service
//!
//! Issues and verifies the signed, time-limited token carrying user identity
//! and role. Tokens are stateless; there is no session store to revoke.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::models::auth::{Caller, TokenClaims};
use crate::models::user::User;
use crate::utils::error::AppError;

/// Token service specific errors
#[derive(Error, Debug)]
pub enum TokenError {
    /// Signing the claims failed
    #[error("Token generation error: {0}")]
    Generation(String),

    /// The presented token is malformed, tampered with or expired
    #[error("Invalid token: {0}")]
    Invalid(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Generation(msg) => AppError::Internal(msg),
            TokenError::Invalid(_) => {
                AppError::Authentication("Invalid or expired token".to_string())
            }
        }
    }
}

/// HS256 signer/verifier for session tokens
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    expires_in: Duration,
}

impl TokenService {
    /// Create a token service with the default one-day expiry
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            expires_in: Duration::hours(24),
        }
    }

    /// Create a token service with a custom expiry
    pub fn with_expiration(secret: String, expires_in: Duration) -> Self {
        Self { secret, expires_in }
    }

    /// Issue a signed token for the given user
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user.id,
            name: user.name.clone(),
            is_admin: user.is_admin,
            iat: now.timestamp(),
            exp: (now + self.expires_in).timestamp(),
        };

        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(self.secret.as_ref());

        encode(&header, &claims, &encoding_key).map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Verify a token and extract the caller identity
    pub fn verify(&self, token: &str) -> Result<Caller, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let decoding_key = DecodingKey::from_secret(self.secret.as_ref());

        decode::<TokenClaims>(token, &decoding_key, &validation)
            .map(|data| Caller::from(&data.claims))
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user(id: i64, is_admin: bool) -> User {
        User {
            id,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            is_admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = TokenService::new("test_secret_key".to_string());
        let token = service.issue(&test_user(7, true)).unwrap();
        let caller = service.verify(&token).unwrap();

        assert_eq!(caller.id, 7);
        assert_eq!(caller.name, "Alice");
        assert!(caller.is_admin);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenService::new("secret_a".to_string());
        let verifier = TokenService::new("secret_b".to_string());

        let token = issuer.issue(&test_user(7, false)).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service =
            TokenService::with_expiration("test_secret_key".to_string(), Duration::seconds(-120));
        let token = service.issue(&test_user(7, false)).unwrap();
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = TokenService::new("test_secret_key".to_string());
        assert!(service.verify("not.a.token").is_err());
    }

    #[test]
    fn test_invalid_token_maps_to_authentication_error() {
        let err: AppError = TokenError::Invalid("boom".to_string()).into();
        assert!(matches!(err, AppError::Authentication(_)));
    }
}
