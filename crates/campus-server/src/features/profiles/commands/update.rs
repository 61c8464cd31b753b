//! Update profile command
//!
//! A role-whitelisted patch over the profile bag: every account may edit
//! the common fields, while role-specific fields only apply when the
//! account's profile actually carries them. Out-of-role fields in the
//! request body are silently ignored, so a student cannot smuggle
//! teacher-only data into their record.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::UserProfile;

/// Patch body for profile updates; absent fields are left untouched, an
/// empty string clears the field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileCommand {
    // Common fields
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,

    // Student fields
    pub requested_class_name: Option<String>,
    pub current_grade: Option<String>,
    pub roll_number: Option<String>,
    pub admission_date: Option<NaiveDate>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,

    // Teacher fields
    pub qualification: Option<String>,
    pub experience: Option<String>,
    pub designation: Option<String>,
    pub school_name: Option<String>,
}

/// Errors that can occur when updating a profile
#[derive(Debug, thiserror::Error)]
pub enum UpdateProfileError {
    #[error("No profile fields provided")]
    EmptyPatch,

    #[error("Account not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UpdateProfileCommand {
    fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.requested_class_name.is_none()
            && self.current_grade.is_none()
            && self.roll_number.is_none()
            && self.admission_date.is_none()
            && self.guardian_name.is_none()
            && self.guardian_phone.is_none()
            && self.qualification.is_none()
            && self.experience.is_none()
            && self.designation.is_none()
            && self.school_name.is_none()
    }

    /// Apply the whitelisted subset of the patch to `profile` in place.
    pub fn apply(&self, profile: &mut UserProfile) {
        {
            let core = profile.core_mut();
            patch(&mut core.first_name, &self.first_name);
            patch(&mut core.last_name, &self.last_name);
            patch(&mut core.phone, &self.phone);
            core.refresh_full_name();
        }

        match profile {
            UserProfile::Student(student) => {
                patch(&mut student.requested_class_name, &self.requested_class_name);
                patch(&mut student.current_grade, &self.current_grade);
                patch(&mut student.roll_number, &self.roll_number);
                if let Some(date) = self.admission_date {
                    student.admission_date = Some(date);
                }
                patch(&mut student.guardian_name, &self.guardian_name);
                patch(&mut student.guardian_phone, &self.guardian_phone);
            }
            UserProfile::Teacher(teacher) => {
                patch(&mut teacher.qualification, &self.qualification);
                patch(&mut teacher.experience, &self.experience);
                patch(&mut teacher.designation, &self.designation);
                patch(&mut teacher.school_name, &self.school_name);
            }
            UserProfile::Admin(_) => {}
        }
    }
}

/// Apply one patch field: absent leaves the target alone, blank clears it.
fn patch(target: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = value {
        let trimmed = v.trim();
        *target = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }
}

/// Handler function for profile updates
#[tracing::instrument(skip(pool, command), fields(user_id = %user_id))]
pub async fn handle(
    pool: PgPool,
    user_id: Uuid,
    command: UpdateProfileCommand,
) -> Result<UserProfile, UpdateProfileError> {
    if command.is_empty() {
        return Err(UpdateProfileError::EmptyPatch);
    }

    let current: Option<Json<UserProfile>> =
        sqlx::query_scalar("SELECT profile FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&pool)
            .await?;
    let mut profile = current.ok_or(UpdateProfileError::NotFound)?.0;

    command.apply(&mut profile);

    sqlx::query("UPDATE users SET profile = $1, updated_at = now() WHERE id = $2")
        .bind(Json(&profile))
        .bind(user_id)
        .execute(&pool)
        .await?;

    tracing::info!("Profile updated");
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, UserProfile};

    #[test]
    fn test_empty_patch_detected() {
        assert!(UpdateProfileCommand::default().is_empty());
        let cmd = UpdateProfileCommand {
            phone: Some("123".to_string()),
            ..Default::default()
        };
        assert!(!cmd.is_empty());
    }

    #[test]
    fn test_apply_refreshes_full_name() {
        let mut profile = UserProfile::empty_for(Role::Teacher);
        let cmd = UpdateProfileCommand {
            first_name: Some("Leila".to_string()),
            last_name: Some("Kade".to_string()),
            ..Default::default()
        };
        cmd.apply(&mut profile);
        assert_eq!(profile.core().full_name.as_deref(), Some("Leila Kade"));
    }

    #[test]
    fn test_apply_ignores_out_of_role_fields() {
        let mut profile = UserProfile::empty_for(Role::Student);
        let cmd = UpdateProfileCommand {
            qualification: Some("PhD".to_string()),
            current_grade: Some("7".to_string()),
            ..Default::default()
        };
        cmd.apply(&mut profile);
        match profile {
            UserProfile::Student(s) => assert_eq!(s.current_grade.as_deref(), Some("7")),
            other => panic!("expected student profile, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_value_clears_field() {
        let mut profile = UserProfile::empty_for(Role::Student);
        if let UserProfile::Student(ref mut s) = profile {
            s.requested_class_name = Some("7A".to_string());
        }
        let cmd = UpdateProfileCommand {
            requested_class_name: Some("   ".to_string()),
            ..Default::default()
        };
        cmd.apply(&mut profile);
        match profile {
            UserProfile::Student(s) => assert!(s.requested_class_name.is_none()),
            other => panic!("expected student profile, got {other:?}"),
        }
    }
}
