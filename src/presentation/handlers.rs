use crate::application::admin_service::AdminService;
use crate::application::auth_service::AuthService;
use crate::application::owner_service::OwnerService;
use crate::application::store_service::StoreService;
use crate::data::rating_repository::InMemoryRatingRepository;
use crate::data::store_repository::InMemoryStoreRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::user::AuthenticatedUser;
use crate::presentation::error::ApiError;
use actix_web::{FromRequest, HttpMessage, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use std::future::{Ready, ready};
use std::sync::Arc;
use tracing::{info, instrument};

// AppState holding the services
pub struct AppState {
    pub auth_service: Arc<AuthService<InMemoryUserRepository>>,
    pub admin_service:
        AdminService<InMemoryUserRepository, InMemoryStoreRepository, InMemoryRatingRepository>,
    pub store_service: StoreService<InMemoryStoreRepository, InMemoryRatingRepository>,
    pub owner_service:
        OwnerService<InMemoryUserRepository, InMemoryStoreRepository, InMemoryRatingRepository>,
}

impl AppState {
    /// Wires every service over one shared set of in-memory tables.
    pub fn in_memory(jwt_secret: String, token_ttl_seconds: u64) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let stores = Arc::new(InMemoryStoreRepository::new());
        let ratings = Arc::new(InMemoryRatingRepository::new());

        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            jwt_secret,
            token_ttl_seconds,
        ));

        Self {
            admin_service: AdminService::new(
                auth_service.clone(),
                users.clone(),
                stores.clone(),
                ratings.clone(),
            ),
            store_service: StoreService::new(stores.clone(), ratings.clone()),
            owner_service: OwnerService::new(users, stores, ratings),
            auth_service,
        }
    }
}

// AuthenticatedUser extractor
impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(user.ok_or_else(|| ApiError::Unauthorized("User not authenticated".to_string())))
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}

pub async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound("Route not found".to_string()))
}
