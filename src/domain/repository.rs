use crate::domain::rating::{NewRating, Rating};
use crate::domain::store::{NewStore, Store};
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user, failing with `DomainError::Conflict` when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: u32) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;
    /// Returns `false` when no user has this id.
    async fn update_password(&self, id: u32, password_hash: String) -> Result<bool>;
    async fn count_users(&self) -> Result<usize>;
}

#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn create_store(&self, store: NewStore) -> Result<Store>;
    async fn find_store_by_id(&self, id: u32) -> Result<Option<Store>>;
    async fn list_stores(&self) -> Result<Vec<Store>>;
    async fn find_stores_by_owner(&self, owner_id: u32) -> Result<Vec<Store>>;
    async fn count_stores(&self) -> Result<usize>;
}

#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Inserts a rating, failing with `DomainError::Conflict` when the user already rated the store.
    async fn create_rating(&self, rating: NewRating) -> Result<Rating>;
    async fn find_rating_by_id(&self, id: u32) -> Result<Option<Rating>>;
    async fn update_rating_value(&self, id: u32, value: u8) -> Result<Option<Rating>>;
    async fn find_ratings_by_store(&self, store_id: u32) -> Result<Vec<Rating>>;
    async fn find_ratings_by_user(&self, user_id: u32) -> Result<Vec<Rating>>;
    async fn list_ratings(&self) -> Result<Vec<Rating>>;
    async fn count_ratings(&self) -> Result<usize>;
}
