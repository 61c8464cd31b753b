//! Shared domain models
//!
//! The account record is a base identity (id, username, email, role) plus a
//! role-discriminated profile payload stored as JSONB. Role-specific fields
//! live only on their variant instead of as semantically-optional fields on
//! one flat struct.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Fields common to every profile variant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileCore {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Derived from first + last on every write; kept stored for display
    /// queries that read the raw JSONB.
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Relative path under the uploads root, e.g. `/uploads/<file>`.
    #[serde(default)]
    pub photo: Option<String>,
}

impl ProfileCore {
    /// Recompute `full_name` from the first/last name parts
    pub fn refresh_full_name(&mut self) {
        let joined = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let joined = joined.trim();
        self.full_name = if joined.is_empty() {
            None
        } else {
            Some(joined.to_string())
        };
    }
}

/// Student-specific profile fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(flatten)]
    pub core: ProfileCore,
    /// Free-text class preference entered by the student; preferred signal
    /// for class-membership-by-name.
    #[serde(default)]
    pub requested_class_name: Option<String>,
    /// Legacy grade field; fallback signal when no class was requested.
    #[serde(default)]
    pub current_grade: Option<String>,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub admission_date: Option<NaiveDate>,
    #[serde(default)]
    pub guardian_name: Option<String>,
    #[serde(default)]
    pub guardian_phone: Option<String>,
}

/// Teacher-specific profile fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeacherProfile {
    #[serde(flatten)]
    pub core: ProfileCore,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub school_name: Option<String>,
}

/// Admin profile carries only the common fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminProfile {
    #[serde(flatten)]
    pub core: ProfileCore,
}

/// Role-tagged profile payload, stored as one JSONB column
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UserProfile {
    Student(StudentProfile),
    Teacher(TeacherProfile),
    Admin(AdminProfile),
}

impl UserProfile {
    /// Empty profile appropriate for a freshly created account
    pub fn empty_for(role: Role) -> Self {
        match role {
            Role::Student => UserProfile::Student(StudentProfile::default()),
            Role::Teacher => UserProfile::Teacher(TeacherProfile::default()),
            Role::Admin => UserProfile::Admin(AdminProfile::default()),
        }
    }

    pub fn core(&self) -> &ProfileCore {
        match self {
            UserProfile::Student(p) => &p.core,
            UserProfile::Teacher(p) => &p.core,
            UserProfile::Admin(p) => &p.core,
        }
    }

    pub fn core_mut(&mut self) -> &mut ProfileCore {
        match self {
            UserProfile::Student(p) => &mut p.core,
            UserProfile::Teacher(p) => &mut p.core,
            UserProfile::Admin(p) => &mut p.core,
        }
    }

    /// Display name with fallback: full name, then first+last, then the
    /// account username.
    pub fn display_name(&self, username: &str) -> String {
        let core = self.core();
        if let Some(full) = core.full_name.as_deref() {
            let full = full.trim();
            if !full.is_empty() {
                return full.to_string();
            }
        }
        let joined = format!(
            "{} {}",
            core.first_name.as_deref().unwrap_or(""),
            core.last_name.as_deref().unwrap_or("")
        );
        let joined = joined.trim();
        if !joined.is_empty() {
            return joined.to_string();
        }
        username.to_string()
    }

    /// A student's class-membership-by-name: the requested class name when
    /// set, falling back to the legacy grade field. `None` for non-students
    /// and for students with neither field.
    pub fn effective_class_name(&self) -> Option<String> {
        let UserProfile::Student(student) = self else {
            return None;
        };
        for candidate in [&student.requested_class_name, &student.current_grade] {
            if let Some(name) = candidate.as_deref() {
                let name = name.trim();
                if !name.is_empty() {
                    return Some(name.to_string());
                }
            }
        }
        None
    }
}

/// Resolve a display name straight from raw profile JSONB, for queries that
/// join against `users` without deserializing the full tagged payload.
pub fn display_name_from_json(profile: &serde_json::Value, username: &str) -> String {
    if let Some(full) = profile.get("full_name").and_then(|v| v.as_str()) {
        if !full.trim().is_empty() {
            return full.trim().to_string();
        }
    }
    let first = profile
        .get("first_name")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let last = profile
        .get("last_name")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let joined = format!("{} {}", first, last);
    let joined = joined.trim();
    if !joined.is_empty() {
        return joined.to_string();
    }
    username.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Student, Role::Teacher, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("principal".parse::<Role>().is_err());
    }

    #[test]
    fn test_profile_tag_serialization() {
        let profile = UserProfile::empty_for(Role::Student);
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["kind"], "student");

        let back: UserProfile = serde_json::from_value(value).unwrap();
        assert!(matches!(back, UserProfile::Student(_)));
    }

    #[test]
    fn test_display_name_fallback_order() {
        let mut profile = UserProfile::empty_for(Role::Student);
        assert_eq!(profile.display_name("ravi123"), "ravi123");

        profile.core_mut().first_name = Some("Ravi".to_string());
        profile.core_mut().last_name = Some("Kumar".to_string());
        assert_eq!(profile.display_name("ravi123"), "Ravi Kumar");

        profile.core_mut().full_name = Some("Ravi K.".to_string());
        assert_eq!(profile.display_name("ravi123"), "Ravi K.");
    }

    #[test]
    fn test_effective_class_name_precedence() {
        let mut student = StudentProfile::default();
        student.current_grade = Some("7A".to_string());
        let profile = UserProfile::Student(student.clone());
        assert_eq!(profile.effective_class_name().as_deref(), Some("7A"));

        student.requested_class_name = Some("  8B  ".to_string());
        let profile = UserProfile::Student(student.clone());
        assert_eq!(profile.effective_class_name().as_deref(), Some("8B"));

        // Blank request falls through to the legacy grade.
        student.requested_class_name = Some("   ".to_string());
        let profile = UserProfile::Student(student);
        assert_eq!(profile.effective_class_name().as_deref(), Some("7A"));
    }

    #[test]
    fn test_effective_class_name_non_student() {
        let profile = UserProfile::empty_for(Role::Teacher);
        assert_eq!(profile.effective_class_name(), None);
    }

    #[test]
    fn test_refresh_full_name() {
        let mut core = ProfileCore::default();
        core.refresh_full_name();
        assert_eq!(core.full_name, None);

        core.first_name = Some("Asha".to_string());
        core.refresh_full_name();
        assert_eq!(core.full_name.as_deref(), Some("Asha"));

        core.last_name = Some("Verma".to_string());
        core.refresh_full_name();
        assert_eq!(core.full_name.as_deref(), Some("Asha Verma"));
    }

    #[test]
    fn test_display_name_from_json_fallbacks() {
        let profile = serde_json::json!({"first_name": "Meera", "last_name": ""});
        assert_eq!(display_name_from_json(&profile, "meera9"), "Meera");

        let empty = serde_json::json!({});
        assert_eq!(display_name_from_json(&empty, "meera9"), "meera9");
    }
}
