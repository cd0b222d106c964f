use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use travelmate_core::CoreError;

use crate::kv::{StoreError, StoreResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Traveller,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Traveller => "Traveller",
            Role::Admin => "Admin",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "Traveller" => Ok(Role::Traveller),
            "Admin" => Ok(Role::Admin),
            other => Err(CoreError::ValidationError(format!(
                "Unknown role: {:?}",
                other
            ))),
        }
    }
}

/// One document in the user collection. The password hash is the PHC
/// string produced at registration; it never leaves the store layer in
/// API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "local_provider")]
    pub provider: String,
    pub created_at: DateTime<Utc>,
}

fn local_provider() -> String {
    "local".to_string()
}

impl UserRecord {
    pub fn new(name: &str, email: &str, password_hash: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash: password_hash.to_string(),
            role,
            provider: local_provider(),
            created_at: Utc::now(),
        }
    }
}

/// Repository seam for the user collection backing the auth service.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user; conflicts on an already-registered email.
    async fn insert(&self, user: UserRecord) -> StoreResult<UserRecord>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>>;

    async fn list(&self) -> StoreResult<Vec<UserRecord>>;

    async fn update_profile(&self, id: Uuid, name: &str, email: &str) -> StoreResult<UserRecord>;

    async fn set_role(&self, id: Uuid, role: Role) -> StoreResult<UserRecord>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    async fn count(&self) -> StoreResult<usize>;
}

#[derive(Default)]
struct UserMap {
    users: HashMap<Uuid, UserRecord>,
}

impl UserMap {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        let email = email.trim().to_lowercase();
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn require(&mut self, id: Uuid) -> StoreResult<&mut UserRecord> {
        self.users
            .get_mut(&id)
            .ok_or_else(|| CoreError::NotFoundError("User not found.".to_string()).into())
    }

    fn sorted(&self) -> Vec<UserRecord> {
        let mut users: Vec<UserRecord> = self.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        users
    }
}

/// In-memory user collection, used by tests and as a throwaway backing.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<UserMap>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: UserRecord) -> StoreResult<UserRecord> {
        let mut inner = self.inner.write().await;
        if inner.email_taken(&user.email, None) {
            return Err(StoreError::Conflict("User already exists.".to_string()));
        }
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let email = email.trim().to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<UserRecord>> {
        Ok(self.inner.read().await.sorted())
    }

    async fn update_profile(&self, id: Uuid, name: &str, email: &str) -> StoreResult<UserRecord> {
        let mut inner = self.inner.write().await;
        if inner.email_taken(email, Some(id)) {
            return Err(StoreError::Conflict("User already exists.".to_string()));
        }
        let user = inner.require(id)?;
        user.name = name.trim().to_string();
        user.email = email.trim().to_lowercase();
        Ok(user.clone())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> StoreResult<UserRecord> {
        let mut inner = self.inner.write().await;
        let user = inner.require(id)?;
        user.role = role;
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.users.remove(&id).is_none() {
            return Err(CoreError::NotFoundError("User not found.".to_string()).into());
        }
        Ok(())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.inner.read().await.users.len())
    }
}

/// User collection persisted as a single JSON array document, the
/// file-backed stand-in for the deployment's document database.
pub struct FileUserStore {
    path: PathBuf,
    inner: RwLock<UserMap>,
}

impl FileUserStore {
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let users = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => {
                let records: Vec<UserRecord> = serde_json::from_str(&raw)?;
                records.into_iter().map(|u| (u.id, u)).collect()
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            inner: RwLock::new(UserMap { users }),
        })
    }

    async fn persist(&self, inner: &UserMap) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let doc = serde_json::to_string_pretty(&inner.sorted())?;
        tokio::fs::write(&self.path, doc).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn insert(&self, user: UserRecord) -> StoreResult<UserRecord> {
        let mut inner = self.inner.write().await;
        if inner.email_taken(&user.email, None) {
            return Err(StoreError::Conflict("User already exists.".to_string()));
        }
        inner.users.insert(user.id, user.clone());
        self.persist(&inner).await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let email = email.trim().to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<UserRecord>> {
        Ok(self.inner.read().await.sorted())
    }

    async fn update_profile(&self, id: Uuid, name: &str, email: &str) -> StoreResult<UserRecord> {
        let mut inner = self.inner.write().await;
        if inner.email_taken(email, Some(id)) {
            return Err(StoreError::Conflict("User already exists.".to_string()));
        }
        let user = inner.require(id)?;
        user.name = name.trim().to_string();
        user.email = email.trim().to_lowercase();
        let updated = user.clone();
        self.persist(&inner).await?;
        Ok(updated)
    }

    async fn set_role(&self, id: Uuid, role: Role) -> StoreResult<UserRecord> {
        let mut inner = self.inner.write().await;
        let user = inner.require(id)?;
        user.role = role;
        let updated = user.clone();
        self.persist(&inner).await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.users.remove(&id).is_none() {
            return Err(CoreError::NotFoundError("User not found.".to_string()).into());
        }
        self.persist(&inner).await
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.inner.read().await.users.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, email: &str) -> UserRecord {
        UserRecord::new(name, email, "$argon2id$stub", Role::Traveller)
    }

    #[tokio::test]
    async fn insert_conflicts_on_duplicate_email() {
        let store = MemoryUserStore::new();
        store.insert(record("Ada", "ada@example.com")).await.unwrap();

        let err = store
            .insert(record("Ada Again", "ADA@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn role_updates_and_deletes() {
        let store = MemoryUserStore::new();
        let user = store.insert(record("Ada", "ada@example.com")).await.unwrap();

        let promoted = store.set_role(user.id, Role::Admin).await.unwrap();
        assert_eq!(promoted.role, Role::Admin);

        store.delete(user.id).await.unwrap();
        assert!(store.delete(user.id).await.is_err());
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");

        let user = {
            let store = FileUserStore::open(&path).await.unwrap();
            store.insert(record("Ada", "ada@example.com")).await.unwrap()
        };

        let reopened = FileUserStore::open(&path).await.unwrap();
        let found = reopened.find_by_email("ada@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }
}
