use crate::error::{IdentityError, Result};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde::{Deserialize, Serialize};

/// Minimum-strength policy applied uniformly to registration, password
/// change and recovery reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_symbol: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 10,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_symbol: true,
        }
    }
}

impl PasswordPolicy {
    pub fn validate(&self, password: &str) -> Result<()> {
        if password.chars().count() < self.min_length {
            return Err(IdentityError::WeakPassword);
        }

        if self.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            return Err(IdentityError::WeakPassword);
        }

        if self.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
            return Err(IdentityError::WeakPassword);
        }

        if self.require_digit && !password.chars().any(|c| c.is_numeric()) {
            return Err(IdentityError::WeakPassword);
        }

        if self.require_symbol && !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err(IdentityError::WeakPassword);
        }

        Ok(())
    }
}

/// Argon2 credential hashing.
#[derive(Default)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| IdentityError::Hashing)?
            .to_string();
        Ok(hash)
    }

    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_accepts_strong_password() {
        let policy = PasswordPolicy::default();
        assert!(policy.validate("Aa1!aaaaaa").is_ok());
    }

    #[test]
    fn default_policy_rejects_weak_passwords() {
        let policy = PasswordPolicy::default();
        // Too short
        assert!(policy.validate("Aa1!a").is_err());
        // No uppercase
        assert!(policy.validate("aa1!aaaaaa").is_err());
        // No lowercase
        assert!(policy.validate("AA1!AAAAAA").is_err());
        // No digit
        assert!(policy.validate("Aab!aaaaaa").is_err());
        // No symbol
        assert!(policy.validate("Aa1aaaaaaa").is_err());
    }

    #[test]
    fn hash_then_verify_round_trip() {
        let hasher = CredentialHasher::new();
        let hash = hasher.hash("Aa1!aaaaaa").unwrap();
        assert!(hasher.verify("Aa1!aaaaaa", &hash));
        assert!(!hasher.verify("wrong-password", &hash));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        let hasher = CredentialHasher::new();
        assert!(!hasher.verify("Aa1!aaaaaa", "not-a-phc-string"));
    }
}
