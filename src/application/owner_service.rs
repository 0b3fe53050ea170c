use crate::domain::error::DomainError;
use crate::domain::rating::average_rating;
use crate::domain::repository::{RatingRepository, StoreRepository, UserRepository};
use crate::domain::stats::{OwnerStoreDashboard, RatedByUser};
use crate::domain::user::{AuthenticatedUser, Role};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct OwnerService<U, S, R>
where
    U: UserRepository,
    S: StoreRepository,
    R: RatingRepository,
{
    user_repository: Arc<U>,
    store_repository: Arc<S>,
    rating_repository: Arc<R>,
}

impl<U, S, R> OwnerService<U, S, R>
where
    U: UserRepository,
    S: StoreRepository,
    R: RatingRepository,
{
    pub fn new(user_repository: Arc<U>, store_repository: Arc<S>, rating_repository: Arc<R>) -> Self {
        Self {
            user_repository,
            store_repository,
            rating_repository,
        }
    }

    /// Per-store ratings for every store `owner` owns, ordered by store id.
    #[instrument(skip(self), fields(owner_id = owner.id))]
    pub async fn dashboard(&self, owner: &AuthenticatedUser) -> Result<Vec<OwnerStoreDashboard>> {
        if owner.role != Role::Owner {
            warn!(role = %owner.role, "Non-owner requested the owner dashboard");
            return Err(DomainError::Forbidden("Access denied".to_string()).into());
        }

        let stores = self.store_repository.find_stores_by_owner(owner.id).await?;
        let mut dashboard = Vec::with_capacity(stores.len());

        for store in stores {
            let ratings = self.rating_repository.find_ratings_by_store(store.id).await?;
            let mut rated_by_users = Vec::with_capacity(ratings.len());
            for rating in &ratings {
                // ratings whose author has vanished are still counted in the average
                if let Some(user) = self.user_repository.find_user_by_id(rating.user_id).await? {
                    rated_by_users.push(RatedByUser {
                        id: user.id,
                        name: user.name,
                        email: user.email,
                        address: user.address,
                        rating: rating.rating,
                    });
                }
            }

            dashboard.push(OwnerStoreDashboard {
                store_id: store.id,
                store_name: store.name,
                average_rating: average_rating(ratings.iter().map(|r| r.rating)),
                ratings_count: ratings.len(),
                rated_by_users,
            });
        }

        debug!(stores = dashboard.len(), "Owner dashboard assembled");
        Ok(dashboard)
    }
}
