use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: u32,
    pub user_id: u32,
    pub store_id: u32,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRating {
    pub user_id: u32,
    pub store_id: u32,
    pub rating: u8,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRating {
    #[serde(default)]
    pub store_id: Option<Value>,
    #[serde(default)]
    pub rating: Option<Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateRating {
    #[serde(default)]
    pub rating: Option<Value>,
}

/// A rating together with the store average after the change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingOutcome {
    pub rating: Rating,
    pub new_average_rating: Option<f64>,
}

/// Mean of `values` rounded half-up to one decimal, or `None` when there are no values.
/// Computed in integer tenths, so an exact 4.25 becomes 4.3.
pub fn average_rating<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = u8>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), v| (sum + u64::from(v), count + 1));
    if count == 0 {
        return None;
    }
    let tenths = (sum * 20 + count) / (count * 2);
    Some(tenths as f64 / 10.0)
}
