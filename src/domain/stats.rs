use crate::domain::store::Store;
use crate::domain::user::UserView;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_stores: usize,
    pub total_ratings: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedStoreSummary {
    #[serde(flatten)]
    pub store: Store,
    pub average_rating: Option<f64>,
    pub ratings_count: usize,
}

/// Aggregates shown for an owner on the admin user detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerStats {
    pub stores: Vec<OwnedStoreSummary>,
    pub stores_count: usize,
    pub average_rating: Option<f64>,
    pub total_ratings: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetails {
    #[serde(flatten)]
    pub user: UserView,
    #[serde(flatten)]
    pub owner_stats: Option<OwnerStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatedByUser {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub rating: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerStoreDashboard {
    pub store_id: u32,
    pub store_name: String,
    pub average_rating: Option<f64>,
    pub ratings_count: usize,
    pub rated_by_users: Vec<RatedByUser>,
}
