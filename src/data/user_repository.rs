use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Default)]
struct UserTable {
    rows: BTreeMap<u32, User>,
    next_id: u32,
}

#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(UserTable::default())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email, role = %user.role))]
    async fn create_user(&self, user: NewUser) -> Result<User> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        if storage.rows.values().any(|u| u.email == user.email) {
            debug!("Email already registered");
            return Err(DomainError::Conflict("Email is already in use".to_string()).into());
        }

        storage.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: storage.next_id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            address: user.address,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        storage.rows.insert(user.id, user.clone());
        debug!(user_id = user.id, "User saved to memory storage");
        Ok(user)
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let storage = self.storage.read().await;
        let user = storage.rows.values().find(|u| u.email == email).cloned();
        match &user {
            Some(u) => debug!(user_id = u.id, "User found in storage"),
            None => trace!("User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_user_by_id(&self, id: u32) -> Result<Option<User>> {
        let storage = self.storage.read().await;
        Ok(storage.rows.get(&id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let storage = self.storage.read().await;
        Ok(storage.rows.values().cloned().collect())
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: u32, password_hash: String) -> Result<bool> {
        let mut storage = self.storage.write().await;
        match storage.rows.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash;
                user.updated_at = Utc::now();
                debug!("Password hash replaced");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_users(&self) -> Result<usize> {
        Ok(self.storage.read().await.rows.len())
    }
}
