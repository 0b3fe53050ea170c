use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use store_rating_api::infrastructure::config::{Config, load_env_file};
use store_rating_api::infrastructure::logging::init_logging;
use store_rating_api::infrastructure::seed::seed_admin;
use store_rating_api::presentation::handlers::AppState;
use store_rating_api::presentation::middleware::{RequestIdMiddleware, TimingMiddleware};
use store_rating_api::presentation::routes;
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let env_file_loaded = load_env_file();
    init_logging();
    info!("Logging initialized successfully");
    if env_file_loaded {
        info!("Loaded variables from .env");
    }

    let config = Config::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    info!("Creating repositories and services");
    let state = web::Data::new(AppState::in_memory(
        config.jwt_secret.clone(),
        config.token_ttl_seconds,
    ));

    if let Some(seed) = &config.admin_seed {
        seed_admin(&state.auth_service, seed).await.map_err(|e| {
            error!(error = %e, "Failed to seed administrator");
            std::io::Error::other(e.to_string())
        })?;
    }

    let auth_service = state.auth_service.clone();

    info!("Configuring HTTP server");
    let server = HttpServer::new(move || {
        let auth_service = auth_service.clone();
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .configure(move |cfg| routes::configure(cfg, auth_service))
    });

    let bind_addr = format!("{}:{}", config.host, config.port);
    info!(address = %bind_addr, "Binding server to address");
    let server = server.bind((config.host.as_str(), config.port))?;

    info!(address = %bind_addr, "Starting HTTP server");
    server.run().await
}
