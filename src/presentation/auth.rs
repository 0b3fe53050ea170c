use crate::domain::user::{CreateUser, LoginRequest, UserSummary};
use crate::presentation::error::ApiError;
use crate::presentation::handlers::AppState;
use crate::presentation::response::{created, ok};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterData {
    pub user: UserSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: UserSummary,
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    info!("Registration request received");

    let user = state
        .auth_service
        .register_user(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to register user");
            ApiError::from(e)
        })?;

    info!(user_id = user.id, "User registered successfully");
    Ok(created(
        "User registered successfully",
        RegisterData {
            user: UserSummary::from(&user),
        },
    ))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    let (token, user) = state
        .auth_service
        .login(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to login");
            ApiError::from(e)
        })?;

    Ok(ok(
        "Login successful",
        LoginData {
            token,
            user: UserSummary::from(&user),
        },
    ))
}
