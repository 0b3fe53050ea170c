use crate::domain::error::DomainError;
use crate::domain::rating::{NewRating, Rating};
use crate::domain::repository::RatingRepository;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Default)]
struct RatingTable {
    rows: BTreeMap<u32, Rating>,
    next_id: u32,
}

#[derive(Clone)]
pub struct InMemoryRatingRepository {
    storage: Arc<RwLock<RatingTable>>,
}

impl InMemoryRatingRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(RatingTable::default())),
        }
    }
}

impl Default for InMemoryRatingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RatingRepository for InMemoryRatingRepository {
    #[instrument(skip(self, rating), fields(user_id = rating.user_id, store_id = rating.store_id))]
    async fn create_rating(&self, rating: NewRating) -> Result<Rating> {
        let mut storage = self.storage.write().await;
        let exists = storage
            .rows
            .values()
            .any(|r| r.user_id == rating.user_id && r.store_id == rating.store_id);
        if exists {
            debug!("User already rated this store");
            return Err(DomainError::Conflict(
                "Rating already exists, use update instead".to_string(),
            )
            .into());
        }

        storage.next_id += 1;
        let now = Utc::now();
        let rating = Rating {
            id: storage.next_id,
            user_id: rating.user_id,
            store_id: rating.store_id,
            rating: rating.rating,
            created_at: now,
            updated_at: now,
        };
        storage.rows.insert(rating.id, rating.clone());
        debug!(rating_id = rating.id, "Rating saved to memory storage");
        Ok(rating)
    }

    async fn find_rating_by_id(&self, id: u32) -> Result<Option<Rating>> {
        Ok(self.storage.read().await.rows.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn update_rating_value(&self, id: u32, value: u8) -> Result<Option<Rating>> {
        let mut storage = self.storage.write().await;
        Ok(storage.rows.get_mut(&id).map(|rating| {
            rating.rating = value;
            rating.updated_at = Utc::now();
            rating.clone()
        }))
    }

    async fn find_ratings_by_store(&self, store_id: u32) -> Result<Vec<Rating>> {
        let storage = self.storage.read().await;
        Ok(storage
            .rows
            .values()
            .filter(|r| r.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn find_ratings_by_user(&self, user_id: u32) -> Result<Vec<Rating>> {
        let storage = self.storage.read().await;
        Ok(storage
            .rows
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_ratings(&self) -> Result<Vec<Rating>> {
        Ok(self.storage.read().await.rows.values().cloned().collect())
    }

    async fn count_ratings(&self) -> Result<usize> {
        Ok(self.storage.read().await.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_rating(user_id: u32, store_id: u32, rating: u8) -> NewRating {
        NewRating {
            user_id,
            store_id,
            rating,
        }
    }

    #[tokio::test]
    async fn test_one_rating_per_user_and_store() {
        let repo = InMemoryRatingRepository::new();
        repo.create_rating(new_rating(1, 1, 4)).await.unwrap();

        let err = repo.create_rating(new_rating(1, 1, 2)).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Conflict(_))
        ));

        // same user, other store; other user, same store
        repo.create_rating(new_rating(1, 2, 3)).await.unwrap();
        repo.create_rating(new_rating(2, 1, 5)).await.unwrap();
        assert_eq!(repo.count_ratings().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_rating_value() {
        let repo = InMemoryRatingRepository::new();
        let saved = repo.create_rating(new_rating(1, 1, 2)).await.unwrap();

        let updated = repo.update_rating_value(saved.id, 5).await.unwrap().unwrap();
        assert_eq!(updated.rating, 5);
        assert_eq!(updated.id, saved.id);
        assert!(updated.updated_at >= saved.updated_at);

        assert!(repo.update_rating_value(42, 3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_store_and_user() {
        let repo = InMemoryRatingRepository::new();
        repo.create_rating(new_rating(1, 10, 4)).await.unwrap();
        repo.create_rating(new_rating(2, 10, 2)).await.unwrap();
        repo.create_rating(new_rating(1, 11, 5)).await.unwrap();

        let for_store = repo.find_ratings_by_store(10).await.unwrap();
        assert_eq!(for_store.len(), 2);

        let by_user = repo.find_ratings_by_user(1).await.unwrap();
        let stores: Vec<u32> = by_user.iter().map(|r| r.store_id).collect();
        assert_eq!(stores, vec![10, 11]);
    }

    #[tokio::test]
    async fn test_concurrent_submissions_keep_one() {
        let repo = InMemoryRatingRepository::new();

        let handles: Vec<_> = (1..=5u8)
            .map(|value| {
                let repo_clone = repo.clone();
                tokio::spawn(async move { repo_clone.create_rating(new_rating(7, 3, value)).await })
            })
            .collect();

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(repo.find_ratings_by_store(3).await.unwrap().len(), 1);
    }
}
