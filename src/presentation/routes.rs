use crate::application::auth_service::AuthService;
use crate::domain::repository::UserRepository;
use crate::domain::user::Role;
use crate::presentation::error::ApiError;
use crate::presentation::handlers::{health_check, not_found};
use crate::presentation::middleware::{JwtAuthMiddleware, RequireRole};
use crate::presentation::{admin, auth, owner, users};
use actix_web::web;
use std::sync::Arc;

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| ApiError::BadRequest(format!("Invalid JSON body: {}", err)).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(format!("Invalid query string: {}", err)).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(format!("Invalid path parameter: {}", err)).into())
}

/// Registers every `/api` route. Handlers expect `web::Data<AppState>` to be registered on the app.
///
/// Routes:
/// - `GET /api/health`
/// - `POST /api/auth/register`, `POST /api/auth/login`
/// - `/api/admin/*` (admin only): `GET dashboard`, `GET|POST users`, `GET users/{id}`, `GET|POST stores`
/// - `/api/users/*` (any role): `PUT update-password`, `GET stores`, `POST ratings`, `PUT ratings/{id}`
/// - `/api/storeOwner/*` (owner only): `GET dashboard`
pub fn configure<R>(cfg: &mut web::ServiceConfig, auth_service: Arc<AuthService<R>>)
where
    R: UserRepository + 'static,
{
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health_check))
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login)),
                )
                .service(
                    web::scope("/admin")
                        .wrap(RequireRole::new(&[Role::Admin]))
                        .wrap(JwtAuthMiddleware::new(auth_service.clone()))
                        .route("/dashboard", web::get().to(admin::dashboard))
                        .route("/users", web::post().to(admin::create_user))
                        .route("/users", web::get().to(admin::list_users))
                        .route("/users/{id}", web::get().to(admin::user_details))
                        .route("/stores", web::post().to(admin::create_store))
                        .route("/stores", web::get().to(admin::list_stores)),
                )
                .service(
                    web::scope("/users")
                        .wrap(JwtAuthMiddleware::new(auth_service.clone()))
                        .route("/update-password", web::put().to(users::update_password))
                        .route("/stores", web::get().to(users::list_stores))
                        .route("/ratings", web::post().to(users::submit_rating))
                        .route("/ratings/{id}", web::put().to(users::update_rating)),
                )
                .service(
                    web::scope("/storeOwner")
                        .wrap(RequireRole::new(&[Role::Owner]))
                        .wrap(JwtAuthMiddleware::new(auth_service))
                        .route("/dashboard", web::get().to(owner::dashboard)),
                )
                .default_service(web::to(not_found)),
        );
}
