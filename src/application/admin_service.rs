use crate::application::auth_service::{AuthService, Registrar};
use crate::domain::error::DomainError;
use crate::domain::query::{
    Page, PageRequest, SortOrder, StoreListParams, StoreSortField, UserListParams, UserSortField,
    matches_filter,
};
use crate::domain::rating::{Rating, average_rating};
use crate::domain::repository::{RatingRepository, StoreRepository, UserRepository};
use crate::domain::stats::{DashboardStats, OwnedStoreSummary, OwnerStats, UserDetails};
use crate::domain::store::{CreateStore, NewStore, Store, StoreOwner, StoreWithStats};
use crate::domain::user::{CreateUser, Role, User, UserView};
use crate::domain::validation::{normalize_email, validate_store};
use anyhow::Result;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct AdminService<U, S, R>
where
    U: UserRepository,
    S: StoreRepository,
    R: RatingRepository,
{
    auth_service: Arc<AuthService<U>>,
    user_repository: Arc<U>,
    store_repository: Arc<S>,
    rating_repository: Arc<R>,
}

/// Rating values grouped by store id.
fn ratings_by_store(ratings: &[Rating]) -> HashMap<u32, Vec<u8>> {
    let mut grouped: HashMap<u32, Vec<u8>> = HashMap::new();
    for rating in ratings {
        grouped.entry(rating.store_id).or_default().push(rating.rating);
    }
    grouped
}

fn compare_users(a: &User, b: &User, field: UserSortField) -> Ordering {
    match field {
        UserSortField::Id => a.id.cmp(&b.id),
        UserSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        UserSortField::Email => a.email.cmp(&b.email),
        UserSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        UserSortField::Role => a.role.as_str().cmp(b.role.as_str()),
    }
    .then_with(|| a.id.cmp(&b.id))
}

fn compare_stores(a: &StoreWithStats, b: &StoreWithStats, field: StoreSortField) -> Ordering {
    match field {
        StoreSortField::Id => a.store.id.cmp(&b.store.id),
        StoreSortField::Name => a
            .store
            .name
            .to_lowercase()
            .cmp(&b.store.name.to_lowercase()),
        StoreSortField::Email => a.store.email.cmp(&b.store.email),
        StoreSortField::CreatedAt => a.store.created_at.cmp(&b.store.created_at),
        // unrated stores sort below every rated one
        StoreSortField::AverageRating => a
            .average_rating
            .unwrap_or(0.0)
            .total_cmp(&b.average_rating.unwrap_or(0.0)),
    }
    .then_with(|| a.store.id.cmp(&b.store.id))
}

impl<U, S, R> AdminService<U, S, R>
where
    U: UserRepository,
    S: StoreRepository,
    R: RatingRepository,
{
    pub fn new(
        auth_service: Arc<AuthService<U>>,
        user_repository: Arc<U>,
        store_repository: Arc<S>,
        rating_repository: Arc<R>,
    ) -> Self {
        Self {
            auth_service,
            user_repository,
            store_repository,
            rating_repository,
        }
    }

    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardStats> {
        let (total_users, total_stores, total_ratings) = tokio::try_join!(
            self.user_repository.count_users(),
            self.store_repository.count_stores(),
            self.rating_repository.count_ratings(),
        )?;
        debug!(total_users, total_stores, total_ratings, "Dashboard counts");
        Ok(DashboardStats {
            total_users,
            total_stores,
            total_ratings,
        })
    }

    /// Creates an account of any role.
    pub async fn create_user(&self, req: CreateUser) -> Result<User> {
        self.auth_service
            .create_user(req, Registrar::Admin)
            .await
            .map_err(|e| match e.downcast_ref::<DomainError>() {
                Some(DomainError::Conflict(_)) => {
                    DomainError::Conflict("Email already in use".to_string()).into()
                }
                _ => e,
            })
    }

    #[instrument(skip(self, req), fields(name = %req.name))]
    pub async fn create_store(&self, req: CreateStore) -> Result<Store> {
        let (errors, owner_id) = validate_store(&req);
        DomainError::check(errors)?;
        let owner_id = owner_id.ok_or_else(|| {
            DomainError::Internal("owner id missing after validation".to_string())
        })?;

        let owner = self
            .user_repository
            .find_user_by_id(owner_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Owner not found".to_string()))?;

        if owner.role != Role::Owner {
            warn!(owner_id, role = %owner.role, "Store owner candidate lacks owner role");
            return Err(DomainError::BadRequest(
                "User must have owner role to own a store".to_string(),
            )
            .into());
        }

        let store = self
            .store_repository
            .create_store(NewStore {
                name: req.name.trim().to_string(),
                email: normalize_email(&req.email),
                address: req.address.unwrap_or_default().trim().to_string(),
                owner_id,
            })
            .await?;

        info!(store_id = store.id, owner_id, "Store created");
        Ok(store)
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self, params: UserListParams) -> Result<Page<UserView>> {
        let role_filter = match params.role.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<Role>() {
                Ok(role) => Some(role),
                // an unknown role matches nobody
                Err(_) => return Ok(PageRequest::new(params.page, params.limit).slice(Vec::new())),
            },
        };

        let mut users: Vec<User> = self
            .user_repository
            .list_users()
            .await?
            .into_iter()
            .filter(|u| matches_filter(&u.name, params.name.as_deref()))
            .filter(|u| matches_filter(&u.email, params.email.as_deref()))
            .filter(|u| matches_filter(u.address.as_deref().unwrap_or(""), params.address.as_deref()))
            .filter(|u| role_filter.is_none_or(|role| u.role == role))
            .collect();

        let field = UserSortField::parse(params.sort_by.as_deref());
        let order = SortOrder::parse(params.order.as_deref());
        users.sort_by(|a, b| order.apply(compare_users(a, b, field)));

        let views = users.iter().map(UserView::from).collect();
        Ok(PageRequest::new(params.page, params.limit).slice(views))
    }

    #[instrument(skip(self))]
    pub async fn list_stores(&self, params: StoreListParams) -> Result<Page<StoreWithStats>> {
        let (stores, users, ratings) = tokio::try_join!(
            self.store_repository.list_stores(),
            self.user_repository.list_users(),
            self.rating_repository.list_ratings(),
        )?;

        let owners: HashMap<u32, StoreOwner> = users
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    StoreOwner {
                        id: u.id,
                        name: u.name,
                        email: u.email,
                    },
                )
            })
            .collect();
        let grouped = ratings_by_store(&ratings);

        let mut rows: Vec<StoreWithStats> = stores
            .into_iter()
            .filter(|s| matches_filter(&s.name, params.name.as_deref()))
            .filter(|s| matches_filter(&s.email, params.email.as_deref()))
            .filter(|s| matches_filter(&s.address, params.address.as_deref()))
            .map(|store| {
                let values = grouped.get(&store.id).map(Vec::as_slice).unwrap_or_default();
                StoreWithStats {
                    owner: owners.get(&store.owner_id).cloned(),
                    average_rating: average_rating(values.iter().copied()),
                    ratings_count: values.len(),
                    store,
                }
            })
            .collect();

        let field = StoreSortField::parse(params.sort_by.as_deref());
        let order = SortOrder::parse(params.order.as_deref());
        rows.sort_by(|a, b| order.apply(compare_stores(a, b, field)));

        Ok(PageRequest::new(params.page, params.limit).slice(rows))
    }

    #[instrument(skip(self))]
    pub async fn user_details(&self, id: u32) -> Result<UserDetails> {
        let user = self
            .user_repository
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))?;

        let owner_stats = if user.role == Role::Owner {
            Some(self.owner_stats(user.id).await?)
        } else {
            None
        };

        Ok(UserDetails {
            user: UserView::from(&user),
            owner_stats,
        })
    }

    async fn owner_stats(&self, owner_id: u32) -> Result<OwnerStats> {
        let stores = self.store_repository.find_stores_by_owner(owner_id).await?;

        let mut all_values = Vec::new();
        let mut summaries = Vec::with_capacity(stores.len());
        for store in stores {
            let values: Vec<u8> = self
                .rating_repository
                .find_ratings_by_store(store.id)
                .await?
                .into_iter()
                .map(|r| r.rating)
                .collect();
            summaries.push(OwnedStoreSummary {
                average_rating: average_rating(values.iter().copied()),
                ratings_count: values.len(),
                store,
            });
            all_values.extend(values);
        }

        Ok(OwnerStats {
            stores_count: summaries.len(),
            stores: summaries,
            average_rating: average_rating(all_values.iter().copied()),
            total_ratings: all_values.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::rating_repository::InMemoryRatingRepository;
    use crate::data::store_repository::InMemoryStoreRepository;
    use crate::data::user_repository::InMemoryUserRepository;
    use crate::domain::rating::NewRating;
    use serde_json::json;

    type Service =
        AdminService<InMemoryUserRepository, InMemoryStoreRepository, InMemoryRatingRepository>;

    struct Fixture {
        service: Service,
        ratings: Arc<InMemoryRatingRepository>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let stores = Arc::new(InMemoryStoreRepository::new());
        let ratings = Arc::new(InMemoryRatingRepository::new());
        let auth = Arc::new(AuthService::new(users.clone(), "secret".to_string(), 3600));
        Fixture {
            service: AdminService::new(auth, users, stores, ratings.clone()),
            ratings,
        }
    }

    fn account(name: &str, email: &str, role: &str) -> CreateUser {
        CreateUser {
            name: format!("{name} {}", "x".repeat(20)),
            email: email.to_string(),
            password: "Passw0rd!".to_string(),
            address: Some(format!("{name} Road")),
            role: Some(role.to_string()),
        }
    }

    fn store(name: &str, owner_id: u32) -> CreateStore {
        CreateStore {
            name: name.to_string(),
            email: format!("{}@shops.example.com", name.to_lowercase().replace(' ', "")),
            address: Some("5 Market Square".to_string()),
            owner_id: Some(json!(owner_id)),
        }
    }

    async fn rate(ratings: &InMemoryRatingRepository, user_id: u32, store_id: u32, value: u8) {
        ratings
            .create_rating(NewRating {
                user_id,
                store_id,
                rating: value,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_store_requires_owner_role() {
        let f = fixture();
        let plain = f
            .service
            .create_user(account("Plain", "plain@example.com", "user"))
            .await
            .unwrap();

        let err = f.service.create_store(store("Corner Shop", plain.id)).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::BadRequest(_))
        ));

        let err = f.service.create_store(store("Corner Shop", 99)).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound(_))
        ));

        let owner = f
            .service
            .create_user(account("Owner", "owner@example.com", "owner"))
            .await
            .unwrap();
        let created = f.service.create_store(store("Corner Shop", owner.id)).await.unwrap();
        assert_eq!(created.owner_id, owner.id);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email_message() {
        let f = fixture();
        f.service
            .create_user(account("First", "taken@example.com", "user"))
            .await
            .unwrap();

        let err = f
            .service
            .create_user(account("Second", "Taken@Example.com", "owner"))
            .await
            .unwrap_err();
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Conflict(message)) => assert_eq!(message, "Email already in use"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dashboard_counts() {
        let f = fixture();
        let owner = f
            .service
            .create_user(account("Owner", "owner@example.com", "owner"))
            .await
            .unwrap();
        let shop = f.service.create_store(store("Corner Shop", owner.id)).await.unwrap();
        rate(&f.ratings, owner.id, shop.id, 4).await;

        let stats = f.service.dashboard().await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_users: 1,
                total_stores: 1,
                total_ratings: 1
            }
        );
    }

    #[tokio::test]
    async fn test_list_users_filters_sorts_and_pages() {
        let f = fixture();
        for (name, email, role) in [
            ("Charlie", "charlie@example.com", "user"),
            ("alice", "alice@example.com", "owner"),
            ("Bob", "bob@example.com", "user"),
        ] {
            f.service.create_user(account(name, email, role)).await.unwrap();
        }

        let page = f.service.list_users(UserListParams::default()).await.unwrap();
        let emails: Vec<&str> = page.items.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["alice@example.com", "bob@example.com", "charlie@example.com"]);

        let page = f
            .service
            .list_users(UserListParams {
                role: Some("user".to_string()),
                sort_by: Some("email".to_string()),
                order: Some("desc".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let emails: Vec<&str> = page.items.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["charlie@example.com", "bob@example.com"]);

        let page = f
            .service
            .list_users(UserListParams {
                page: Some(2),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 2);

        let page = f
            .service
            .list_users(UserListParams {
                address: Some("BOB road".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);

        let page = f
            .service
            .list_users(UserListParams {
                role: Some("wizard".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_list_stores_with_averages() {
        let f = fixture();
        let owner = f
            .service
            .create_user(account("Owner", "owner@example.com", "owner"))
            .await
            .unwrap();
        let bakery = f.service.create_store(store("Bakery", owner.id)).await.unwrap();
        let florist = f.service.create_store(store("Florist", owner.id)).await.unwrap();
        f.service.create_store(store("Arcade", owner.id)).await.unwrap();

        rate(&f.ratings, 10, bakery.id, 4).await;
        rate(&f.ratings, 11, bakery.id, 5).await;
        rate(&f.ratings, 10, florist.id, 2).await;

        let page = f
            .service
            .list_stores(StoreListParams {
                sort_by: Some("averageRating".to_string()),
                order: Some("DESC".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let summary: Vec<(&str, Option<f64>, usize)> = page
            .items
            .iter()
            .map(|s| (s.store.name.as_str(), s.average_rating, s.ratings_count))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Bakery", Some(4.5), 2),
                ("Florist", Some(2.0), 1),
                ("Arcade", None, 0),
            ]
        );
        assert_eq!(page.items[0].owner.as_ref().unwrap().id, owner.id);
    }

    #[tokio::test]
    async fn test_user_details_for_owner() {
        let f = fixture();
        let owner = f
            .service
            .create_user(account("Owner", "owner@example.com", "owner"))
            .await
            .unwrap();
        let a = f.service.create_store(store("Bakery", owner.id)).await.unwrap();
        let b = f.service.create_store(store("Florist", owner.id)).await.unwrap();
        rate(&f.ratings, 10, a.id, 5).await;
        rate(&f.ratings, 11, a.id, 4).await;
        rate(&f.ratings, 10, b.id, 2).await;

        let details = f.service.user_details(owner.id).await.unwrap();
        let stats = details.owner_stats.unwrap();
        assert_eq!(stats.stores_count, 2);
        assert_eq!(stats.total_ratings, 3);
        // 11 / 3
        assert_eq!(stats.average_rating, Some(3.7));
        assert_eq!(stats.stores[0].average_rating, Some(4.5));
    }

    #[tokio::test]
    async fn test_user_details_plain_user_and_missing() {
        let f = fixture();
        let user = f
            .service
            .create_user(account("Plain", "plain@example.com", "user"))
            .await
            .unwrap();
        let details = f.service.user_details(user.id).await.unwrap();
        assert!(details.owner_stats.is_none());

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["email"], "plain@example.com");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("stores").is_none());

        let err = f.service.user_details(404).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound(_))
        ));
    }
}
