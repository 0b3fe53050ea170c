use crate::domain::stats::OwnerStoreDashboard;
use crate::domain::user::AuthenticatedUser;
use crate::presentation::error::ApiError;
use crate::presentation::handlers::AppState;
use crate::presentation::response::ok;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerDashboard {
    pub dashboard: Vec<OwnerStoreDashboard>,
}

#[instrument(skip(state), fields(owner_id = user.id))]
pub async fn dashboard(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let dashboard = state.owner_service.dashboard(&user).await?;
    Ok(ok(
        "Dashboard data retrieved successfully",
        OwnerDashboard { dashboard },
    ))
}
