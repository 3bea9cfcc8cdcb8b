//! Authentication Models
//!
//! Token claims and the caller identity derived from a verified token.

use serde::{Deserialize, Serialize};

/// Claims carried by the signed session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user's id
    pub sub: i64,

    /// Display name at the time of issuance
    pub name: String,

    /// Role flag at the time of issuance
    pub is_admin: bool,

    /// Issued-at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// The identity acting on the current request
///
/// Derived from a validated token by the auth middleware and stored in
/// request extensions.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: i64,
    pub name: String,
    pub is_admin: bool,
}

impl From<&TokenClaims> for Caller {
    fn from(claims: &TokenClaims) -> Self {
        Caller {
            id: claims.sub,
            name: claims.name.clone(),
            is_admin: claims.is_admin,
        }
    }
}
