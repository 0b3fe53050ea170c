use crate::domain::query::{Pagination, StoreListParams, UserListParams};
use crate::domain::store::{CreateStore, StoreWithStats};
use crate::domain::user::{CreateUser, UserView};
use crate::presentation::error::ApiError;
use crate::presentation::handlers::AppState;
use crate::presentation::response::{created, ok};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

#[derive(Debug, Serialize, Deserialize)]
pub struct UserList {
    pub users: Vec<UserView>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreList {
    pub stores: Vec<StoreWithStats>,
    pub pagination: Pagination,
}

#[instrument(skip(state))]
pub async fn dashboard(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let stats = state.admin_service.dashboard().await?;
    Ok(ok("Successfully fetched stats", stats))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn create_user(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    let user = state.admin_service.create_user(req.into_inner()).await?;
    info!(user_id = user.id, role = %user.role, "Administrator created user");
    Ok(created("User created successfully", UserView::from(&user)))
}

#[instrument(skip(state, req), fields(name = %req.name))]
pub async fn create_store(
    state: web::Data<AppState>,
    req: web::Json<CreateStore>,
) -> Result<HttpResponse, ApiError> {
    let store = state.admin_service.create_store(req.into_inner()).await?;
    info!(store_id = store.id, "Administrator created store");
    Ok(created("Store created successfully", store))
}

#[instrument(skip(state))]
pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<UserListParams>,
) -> Result<HttpResponse, ApiError> {
    let page = state.admin_service.list_users(query.into_inner()).await?;
    Ok(ok(
        "Successfully fetched users",
        UserList {
            users: page.items,
            pagination: page.pagination,
        },
    ))
}

#[instrument(skip(state))]
pub async fn list_stores(
    state: web::Data<AppState>,
    query: web::Query<StoreListParams>,
) -> Result<HttpResponse, ApiError> {
    let page = state.admin_service.list_stores(query.into_inner()).await?;
    Ok(ok(
        "Successfully fetched stores",
        StoreList {
            stores: page.items,
            pagination: page.pagination,
        },
    ))
}

#[instrument(skip(state), fields(user_id = %*path))]
pub async fn user_details(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> Result<HttpResponse, ApiError> {
    let details = state.admin_service.user_details(path.into_inner()).await?;
    Ok(ok("Successfully fetched user details", details))
}
