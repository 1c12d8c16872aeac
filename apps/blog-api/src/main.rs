//! # Blog API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer};
use tracing_actix_web::TracingLogger;

use blog_api::config::AppConfig;
use blog_api::configure_app;
use blog_api::observability::RequestIdMiddleware;
use blog_api::state::AppState;
use blog_api::telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        host = %config.host,
        port = config.port,
        "Starting blog API server"
    );

    let state = AppState::new(&config).await.map_err(|e| {
        tracing::error!(error = %e, "Startup failed");
        std::io::Error::other(e)
    })?;

    let app = configure_app(state);
    HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .configure(app.clone())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
