//! Signup command
//!
//! Creates an account with a role-tagged profile bag. The email is
//! normalized to lower case before storage; duplicates surface as a
//! conflict via the unique constraint rather than a racy pre-check.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::accounts::types::{hash_password, AccountInfo};
use crate::features::shared::validation::{validate_name, NameValidationError};
use crate::models::{Role, UserProfile};

const MIN_PASSWORD_LEN: usize = 6;

/// Command to create a new account
#[derive(Debug, Clone, Deserialize)]
pub struct SignupCommand {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,

    /// Optional profile seed fields
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Students only; ignored for other roles
    #[serde(default)]
    pub requested_class_name: Option<String>,
}

/// Response from signup: the token plus the public account view
#[derive(Debug, Clone, Serialize)]
pub struct SignupResponse {
    pub token: String,
    pub user: AccountInfo,
}

/// Errors that can occur during signup
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("Email is required")]
    EmailRequired,

    #[error("Invalid email address")]
    EmailInvalid,

    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    #[error("Unknown role '{0}'")]
    UnknownRole(String),

    #[error("An account with this email already exists")]
    DuplicateEmail,

    #[error("Failed to issue token: {0}")]
    Token(#[from] crate::middleware::auth::TokenError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl SignupCommand {
    /// Validate and normalize the command
    ///
    /// Returns the parsed role and the normalized email.
    pub fn validate(&self) -> Result<(Role, String), SignupError> {
        validate_name(&self.username, "Username", 100)?;

        let email = self.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(SignupError::EmailRequired);
        }
        // Minimal shape check; real deliverability is out of scope
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(SignupError::EmailInvalid);
        }

        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(SignupError::PasswordTooShort);
        }

        let role: Role = self
            .role
            .parse()
            .map_err(|_| SignupError::UnknownRole(self.role.clone()))?;

        Ok((role, email))
    }

    /// Build the initial profile bag for the new account
    fn seed_profile(&self, role: Role) -> UserProfile {
        let mut profile = UserProfile::empty_for(role);
        {
            let core = profile.core_mut();
            core.first_name = self.first_name.as_deref().map(str::trim).map(String::from);
            core.last_name = self.last_name.as_deref().map(str::trim).map(String::from);
            core.refresh_full_name();
        }
        if let UserProfile::Student(ref mut student) = profile {
            student.requested_class_name = self
                .requested_class_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from);
        }
        profile
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InsertedUser {
    id: Uuid,
    username: String,
    email: String,
    role: String,
    profile: Json<UserProfile>,
}

/// Handler function for signup
#[tracing::instrument(skip(pool, auth, command), fields(email = %command.email, role = %command.role))]
pub async fn handle(
    pool: PgPool,
    auth: crate::middleware::auth::AuthKeys,
    command: SignupCommand,
) -> Result<SignupResponse, SignupError> {
    let (role, email) = command.validate()?;
    let profile = command.seed_profile(role);
    let password_hash = hash_password(&command.password);

    let row = sqlx::query_as::<_, InsertedUser>(
        r#"
        INSERT INTO users (username, email, password_hash, role, profile)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, username, email, role, profile
        "#,
    )
    .bind(command.username.trim())
    .bind(&email)
    .bind(&password_hash)
    .bind(role.as_str())
    .bind(Json(&profile))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if crate::features::shared::is_unique_violation(&e) {
            SignupError::DuplicateEmail
        } else {
            SignupError::Database(e)
        }
    })?;

    let token = auth.issue(row.id, role)?;

    tracing::info!(user_id = %row.id, "Account created");

    Ok(SignupResponse {
        token,
        user: AccountInfo {
            id: row.id,
            username: row.username,
            email: row.email,
            role: row.role.parse().unwrap_or(role),
            profile: row.profile.0,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_command() -> SignupCommand {
        SignupCommand {
            username: "amrita".to_string(),
            email: "Amrita@Example.COM".to_string(),
            password: "secret1".to_string(),
            role: "student".to_string(),
            first_name: Some("Amrita".to_string()),
            last_name: Some("Rao".to_string()),
            requested_class_name: Some(" 7A ".to_string()),
        }
    }

    #[test]
    fn test_validate_normalizes_email() {
        let (role, email) = base_command().validate().unwrap();
        assert_eq!(role, Role::Student);
        assert_eq!(email, "amrita@example.com");
    }

    #[test]
    fn test_validate_rejects_short_password() {
        let mut cmd = base_command();
        cmd.password = "abc".to_string();
        assert!(matches!(cmd.validate(), Err(SignupError::PasswordTooShort)));
    }

    #[test]
    fn test_validate_rejects_unknown_role() {
        let mut cmd = base_command();
        cmd.role = "principal".to_string();
        assert!(matches!(cmd.validate(), Err(SignupError::UnknownRole(_))));
    }

    #[test]
    fn test_seed_profile_trims_requested_class() {
        let cmd = base_command();
        let profile = cmd.seed_profile(Role::Student);
        match profile {
            UserProfile::Student(s) => {
                assert_eq!(s.requested_class_name.as_deref(), Some("7A"));
                assert_eq!(s.core.full_name.as_deref(), Some("Amrita Rao"));
            }
            other => panic!("expected student profile, got {other:?}"),
        }
    }

    #[test]
    fn test_seed_profile_ignores_class_for_teachers() {
        let cmd = base_command();
        let profile = cmd.seed_profile(Role::Teacher);
        assert!(matches!(profile, UserProfile::Teacher(_)));
    }
}
