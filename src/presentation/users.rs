use crate::domain::query::StoreSearchParams;
use crate::domain::rating::{SubmitRating, UpdateRating};
use crate::domain::user::{AuthenticatedUser, UpdatePassword};
use crate::presentation::error::ApiError;
use crate::presentation::handlers::AppState;
use crate::presentation::response::{created, ok};
use actix_web::{HttpResponse, web};
use tracing::{instrument, warn};

#[instrument(skip(state, req), fields(user_id = user.id))]
pub async fn update_password(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdatePassword>,
) -> Result<HttpResponse, ApiError> {
    state
        .auth_service
        .update_password(user.id, req.into_inner())
        .await
        .map_err(|e| {
            warn!(error = %e, "Password update failed");
            ApiError::from(e)
        })?;
    Ok(ok("Password updated", serde_json::json!({})))
}

#[instrument(skip(state), fields(user_id = user.id))]
pub async fn list_stores(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<StoreSearchParams>,
) -> Result<HttpResponse, ApiError> {
    let stores = state
        .store_service
        .list_for_user(user.id, query.into_inner())
        .await?;
    Ok(ok("Stores retrieved successfully", stores))
}

#[instrument(skip(state, req), fields(user_id = user.id))]
pub async fn submit_rating(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<SubmitRating>,
) -> Result<HttpResponse, ApiError> {
    let outcome = state
        .store_service
        .submit_rating(user.id, req.into_inner())
        .await?;
    Ok(created("Rating submitted successfully", outcome))
}

#[instrument(skip(state, req), fields(user_id = user.id, rating_id = %*path))]
pub async fn update_rating(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<u32>,
    req: web::Json<UpdateRating>,
) -> Result<HttpResponse, ApiError> {
    let outcome = state
        .store_service
        .update_rating(user.id, path.into_inner(), req.into_inner())
        .await?;
    Ok(ok("Rating updated successfully", outcome))
}
