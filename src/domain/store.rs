use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_id: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_id: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStore {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub owner_id: Option<Value>,
}

/// Owner fields embedded in the admin store listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreOwner {
    pub id: u32,
    pub name: String,
    pub email: String,
}

/// A store as the admin listing shows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreWithStats {
    #[serde(flatten)]
    pub store: Store,
    pub owner: Option<StoreOwner>,
    pub average_rating: Option<f64>,
    pub ratings_count: usize,
}

/// A store as an end user browses it, with their own rating if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreForUser {
    pub id: u32,
    pub name: String,
    pub address: String,
    pub email: String,
    pub average_rating: Option<f64>,
    pub ratings_count: usize,
    pub user_rating: Option<u8>,
    pub rating_id: Option<u32>,
}
