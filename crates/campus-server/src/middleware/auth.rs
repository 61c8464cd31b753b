//! Bearer-token authentication
//!
//! Tokens are HS256 JWTs carrying the account id and role. The [`AuthUser`]
//! extractor verifies the `Authorization: Bearer ...` header before any
//! handler body runs; an absent or invalid token is rejected uniformly as
//! unauthorized without detail about why verification failed.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::api::response::AppError;
use crate::models::Role;

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: Uuid,
    pub role: Role,
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Issued-at, seconds since epoch
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token could not be issued: {0}")]
    Issue(jsonwebtoken::errors::Error),

    #[error("Token is not valid")]
    Invalid,
}

/// Signing and verification keys, shared across handlers via state
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl AuthKeys {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue a signed, time-limited session token for an account
    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            role,
            exp: now + self.ttl_secs as i64,
            iat: now,
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Issue)
    }

    /// Verify a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

/// Authenticated caller, attached to request context by extraction
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    /// Role guard for teacher-only operations
    pub fn require_teacher(&self) -> Result<(), AppError> {
        if self.role == Role::Teacher {
            Ok(())
        } else {
            Err(AppError::Forbidden("Teacher account required".to_string()))
        }
    }

    /// Role guard for student-only operations
    pub fn require_student(&self) -> Result<(), AppError> {
        if self.role == Role::Student {
            Ok(())
        } else {
            Err(AppError::Forbidden("Student account required".to_string()))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AuthKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = AuthKeys::from_ref(state);

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let claims = keys
            .verify(token)
            .map_err(|_| AppError::Unauthorized("Token is not valid".to_string()))?;

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> AuthKeys {
        AuthKeys::new("unit-test-secret", 3600)
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let keys = keys();
        let id = Uuid::new_v4();

        let token = keys.issue(id, Role::Teacher).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Teacher);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(keys().verify("not-a-token").is_err());
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = keys().issue(Uuid::new_v4(), Role::Student).unwrap();
        let other = AuthKeys::new("different-secret", 3600);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_role_guards() {
        let teacher = AuthUser {
            id: Uuid::new_v4(),
            role: Role::Teacher,
        };
        assert!(teacher.require_teacher().is_ok());
        assert!(teacher.require_student().is_err());

        let student = AuthUser {
            id: Uuid::new_v4(),
            role: Role::Student,
        };
        assert!(student.require_student().is_ok());
        assert!(student.require_teacher().is_err());
    }
}
