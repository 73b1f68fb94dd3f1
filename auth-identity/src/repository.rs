use crate::error::{IdentityError, Result};
use crate::models::{normalize_email, Identity};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Storage seam for identity records.
///
/// The in-memory implementation below is the one in scope; a durable
/// implementation only has to honor the same contract.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>>;

    /// Fails with [`IdentityError::DuplicateIdentifier`] if the email is taken.
    async fn insert(&self, identity: Identity) -> Result<Identity>;

    /// Replaces the stored identity record. Fails with
    /// [`IdentityError::NotFound`] for unknown emails.
    async fn update(&self, identity: Identity) -> Result<Identity>;

    /// Fails with [`IdentityError::NotFound`] for unknown emails.
    async fn update_credential(&self, email: &str, new_hash: &str) -> Result<()>;

    async fn update_last_active(&self, email: &str, at: DateTime<Utc>) -> Result<()>;
}

/// In-memory credential table, keyed by normalized email.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    identities: DashMap<String, Identity>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
        let key = normalize_email(email);
        Ok(self.identities.get(&key).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, identity: Identity) -> Result<Identity> {
        let key = normalize_email(&identity.email);
        match self.identities.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(IdentityError::DuplicateIdentifier),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(identity.clone());
                Ok(identity)
            }
        }
    }

    async fn update(&self, identity: Identity) -> Result<Identity> {
        let key = normalize_email(&identity.email);
        let mut entry = self.identities.get_mut(&key).ok_or(IdentityError::NotFound)?;
        *entry = identity.clone();
        Ok(identity)
    }

    async fn update_credential(&self, email: &str, new_hash: &str) -> Result<()> {
        let key = normalize_email(email);
        let mut entry = self.identities.get_mut(&key).ok_or(IdentityError::NotFound)?;
        entry.password_hash = new_hash.to_string();
        Ok(())
    }

    async fn update_last_active(&self, email: &str, at: DateTime<Utc>) -> Result<()> {
        let key = normalize_email(email);
        let mut entry = self.identities.get_mut(&key).ok_or(IdentityError::NotFound)?;
        entry.last_active_at = Some(at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use uuid::Uuid;

    fn identity(email: &str) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: email.to_string(),
            display_name: "Test".to_string(),
            role: Role::Patient,
            password_hash: "hash".to_string(),
            mfa_enabled: false,
            mfa_secret: None,
            email_verified: false,
            created_at: Utc::now(),
            last_active_at: None,
        }
    }

    #[tokio::test]
    async fn insert_then_find() {
        let store = InMemoryCredentialStore::new();
        store.insert(identity("ana@clinic.com")).await.unwrap();

        let found = store.find_by_email("ana@clinic.com").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive() {
        let store = InMemoryCredentialStore::new();
        store.insert(identity("Ana@Clinic.com")).await.unwrap();

        let found = store.find_by_email("ana@clinic.com").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = InMemoryCredentialStore::new();
        store.insert(identity("ana@clinic.com")).await.unwrap();

        let err = store.insert(identity("ANA@clinic.com")).await.unwrap_err();
        assert!(matches!(err, IdentityError::DuplicateIdentifier));
    }

    #[tokio::test]
    async fn update_credential_requires_existing_account() {
        let store = InMemoryCredentialStore::new();
        let err = store
            .update_credential("ghost@clinic.com", "new-hash")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::NotFound));

        store.insert(identity("ana@clinic.com")).await.unwrap();
        store
            .update_credential("ana@clinic.com", "new-hash")
            .await
            .unwrap();

        let found = store
            .find_by_email("ana@clinic.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.password_hash, "new-hash");
    }
}
