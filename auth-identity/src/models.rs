use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles form a total order: every role satisfies checks for the roles
/// below it, and `SuperAdmin` satisfies everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Professional,
    Admin,
    SuperAdmin,
}

impl Role {
    fn rank(self) -> u8 {
        match self {
            Role::Patient => 0,
            Role::Professional => 1,
            Role::Admin => 2,
            Role::SuperAdmin => 3,
        }
    }

    /// Whether a holder of this role passes a check requiring `required`.
    pub fn satisfies(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }
}

/// A registered account.
///
/// The credential hash and MFA secret are never serialized; the session
/// snapshot and any other persisted form carry the identity without them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub mfa_enabled: bool,
    #[serde(skip_serializing, default)]
    pub mfa_secret: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub last_active_at: Option<DateTime<Utc>>,
}

/// Canonical form used for store keys and throttle keys.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Structural email check; full deliverability validation is out of scope.
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_hierarchy_is_total_order() {
        assert!(Role::SuperAdmin.satisfies(Role::Patient));
        assert!(Role::SuperAdmin.satisfies(Role::Professional));
        assert!(Role::SuperAdmin.satisfies(Role::Admin));
        assert!(Role::SuperAdmin.satisfies(Role::SuperAdmin));

        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(!Role::Admin.satisfies(Role::SuperAdmin));

        assert!(Role::Professional.satisfies(Role::Patient));
        assert!(!Role::Professional.satisfies(Role::Admin));

        assert!(Role::Patient.satisfies(Role::Patient));
        assert!(!Role::Patient.satisfies(Role::Professional));
    }

    #[test]
    fn email_normalization_lowercases_and_trims() {
        assert_eq!(normalize_email("  Ana@Clinic.COM "), "ana@clinic.com");
    }

    #[test]
    fn email_format_check() {
        assert!(is_valid_email("ana@clinic.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@dot"));
    }

    #[test]
    fn credential_hash_is_not_serialized() {
        let identity = Identity {
            id: Uuid::new_v4(),
            email: "ana@clinic.com".to_string(),
            display_name: "Ana".to_string(),
            role: Role::Patient,
            password_hash: "secret-hash".to_string(),
            mfa_enabled: false,
            mfa_secret: Some("secret".to_string()),
            email_verified: false,
            created_at: Utc::now(),
            last_active_at: None,
        };

        let json = serde_json::to_string(&identity).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("mfa_secret"));

        let restored: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.email, identity.email);
        assert!(restored.password_hash.is_empty());
        assert!(restored.mfa_secret.is_none());
    }
}
