use crate::domain::error::DomainError;
use crate::domain::query::{StoreSearchParams, matches_filter};
use crate::domain::rating::{NewRating, RatingOutcome, SubmitRating, UpdateRating, average_rating};
use crate::domain::repository::{RatingRepository, StoreRepository};
use crate::domain::store::StoreForUser;
use crate::domain::validation::{validate_rating_value, validate_store_id};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Store browsing and rating for signed-in users.
pub struct StoreService<S: StoreRepository, R: RatingRepository> {
    store_repository: Arc<S>,
    rating_repository: Arc<R>,
}

impl<S: StoreRepository, R: RatingRepository> StoreService<S, R> {
    pub fn new(store_repository: Arc<S>, rating_repository: Arc<R>) -> Self {
        Self {
            store_repository,
            rating_repository,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_for_user(
        &self,
        user_id: u32,
        params: StoreSearchParams,
    ) -> Result<Vec<StoreForUser>> {
        let (stores, ratings, own_ratings) = tokio::try_join!(
            self.store_repository.list_stores(),
            self.rating_repository.list_ratings(),
            self.rating_repository.find_ratings_by_user(user_id),
        )?;

        let mut per_store: HashMap<u32, Vec<u8>> = HashMap::new();
        for rating in &ratings {
            per_store.entry(rating.store_id).or_default().push(rating.rating);
        }
        let mine: HashMap<u32, (u8, u32)> = own_ratings
            .into_iter()
            .map(|r| (r.store_id, (r.rating, r.id)))
            .collect();

        let mut rows: Vec<StoreForUser> = stores
            .into_iter()
            .filter(|s| matches_filter(&s.name, params.name.as_deref()))
            .filter(|s| matches_filter(&s.address, params.address.as_deref()))
            .map(|store| {
                let values = per_store.get(&store.id).map(Vec::as_slice).unwrap_or_default();
                let own = mine.get(&store.id).copied();
                StoreForUser {
                    id: store.id,
                    name: store.name,
                    address: store.address,
                    email: store.email,
                    average_rating: average_rating(values.iter().copied()),
                    ratings_count: values.len(),
                    user_rating: own.map(|(value, _)| value),
                    rating_id: own.map(|(_, id)| id),
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn store_average(&self, store_id: u32) -> Result<Option<f64>> {
        let ratings = self.rating_repository.find_ratings_by_store(store_id).await?;
        Ok(average_rating(ratings.into_iter().map(|r| r.rating)))
    }

    #[instrument(skip(self, req))]
    pub async fn submit_rating(&self, user_id: u32, req: SubmitRating) -> Result<RatingOutcome> {
        let mut errors = Vec::new();
        let store_id = validate_store_id(&mut errors, req.store_id.as_ref());
        let value = validate_rating_value(&mut errors, req.rating.as_ref());
        DomainError::check(errors)?;
        let (Some(store_id), Some(value)) = (store_id, value) else {
            return Err(DomainError::Internal("rating fields missing after validation".to_string()).into());
        };

        if self.store_repository.find_store_by_id(store_id).await?.is_none() {
            warn!(store_id, "Rating submitted for unknown store");
            return Err(DomainError::NotFound("Store not found".to_string()).into());
        }

        let rating = self
            .rating_repository
            .create_rating(NewRating {
                user_id,
                store_id,
                rating: value,
            })
            .await?;
        let new_average_rating = self.store_average(store_id).await?;

        info!(rating_id = rating.id, store_id, value, "Rating submitted");
        Ok(RatingOutcome {
            rating,
            new_average_rating,
        })
    }

    #[instrument(skip(self, req))]
    pub async fn update_rating(
        &self,
        user_id: u32,
        rating_id: u32,
        req: UpdateRating,
    ) -> Result<RatingOutcome> {
        let mut errors = Vec::new();
        let value = validate_rating_value(&mut errors, req.rating.as_ref());
        DomainError::check(errors)?;
        let Some(value) = value else {
            return Err(DomainError::Internal("rating missing after validation".to_string()).into());
        };

        let existing = self
            .rating_repository
            .find_rating_by_id(rating_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Rating not found".to_string()))?;

        if existing.user_id != user_id {
            warn!(rating_id, owner = existing.user_id, "Attempt to update another user's rating");
            return Err(DomainError::Forbidden(
                "You are not authorized to update this rating".to_string(),
            )
            .into());
        }

        let rating = self
            .rating_repository
            .update_rating_value(rating_id, value)
            .await?
            .ok_or_else(|| DomainError::NotFound("Rating not found".to_string()))?;
        let new_average_rating = self.store_average(rating.store_id).await?;

        info!(rating_id, value, "Rating updated");
        Ok(RatingOutcome {
            rating,
            new_average_rating,
        })
    }
}
