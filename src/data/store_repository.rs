use crate::domain::repository::StoreRepository;
use crate::domain::store::{NewStore, Store};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Default)]
struct StoreTable {
    rows: BTreeMap<u32, Store>,
    next_id: u32,
}

#[derive(Clone)]
pub struct InMemoryStoreRepository {
    storage: Arc<RwLock<StoreTable>>,
}

impl InMemoryStoreRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(StoreTable::default())),
        }
    }
}

impl Default for InMemoryStoreRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreRepository for InMemoryStoreRepository {
    #[instrument(skip(self, store), fields(name = %store.name, owner_id = store.owner_id))]
    async fn create_store(&self, store: NewStore) -> Result<Store> {
        let mut storage = self.storage.write().await;
        storage.next_id += 1;
        let now = Utc::now();
        let store = Store {
            id: storage.next_id,
            name: store.name,
            email: store.email,
            address: store.address,
            owner_id: store.owner_id,
            created_at: now,
            updated_at: now,
        };
        storage.rows.insert(store.id, store.clone());
        debug!(store_id = store.id, "Store saved to memory storage");
        Ok(store)
    }

    async fn find_store_by_id(&self, id: u32) -> Result<Option<Store>> {
        Ok(self.storage.read().await.rows.get(&id).cloned())
    }

    async fn list_stores(&self) -> Result<Vec<Store>> {
        Ok(self.storage.read().await.rows.values().cloned().collect())
    }

    async fn find_stores_by_owner(&self, owner_id: u32) -> Result<Vec<Store>> {
        let storage = self.storage.read().await;
        Ok(storage
            .rows
            .values()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn count_stores(&self) -> Result<usize> {
        Ok(self.storage.read().await.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_store(name: &str, owner_id: u32) -> NewStore {
        NewStore {
            name: name.to_string(),
            email: format!("{}@shops.example.com", name.to_lowercase()),
            address: "1 High Street".to_string(),
            owner_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_store() {
        let repo = InMemoryStoreRepository::new();
        let store = repo.create_store(new_store("Bakery", 3)).await.unwrap();
        assert_eq!(store.id, 1);

        let found = repo.find_store_by_id(1).await.unwrap().unwrap();
        assert_eq!(found.name, "Bakery");
        assert_eq!(found.owner_id, 3);
        assert!(repo.find_store_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_stores_by_owner() {
        let repo = InMemoryStoreRepository::new();
        repo.create_store(new_store("Bakery", 3)).await.unwrap();
        repo.create_store(new_store("Butcher", 4)).await.unwrap();
        repo.create_store(new_store("Grocer", 3)).await.unwrap();

        let owned = repo.find_stores_by_owner(3).await.unwrap();
        let names: Vec<&str> = owned.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Bakery", "Grocer"]);
        assert_eq!(repo.count_stores().await.unwrap(), 3);
        assert!(repo.find_stores_by_owner(9).await.unwrap().is_empty());
    }
}
