//! # Blog API
//!
//! Actix-web HTTP layer for the blog backend. `main.rs` owns process
//! startup; everything needed to mount the application lives here so tests
//! can build the same app.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

use actix_web::{HttpResponse, web};

use crate::middleware::error::{AppError, json_config, path_config, query_config};
use crate::state::AppState;

/// Mount state, extractor configuration and routes.
pub fn configure_app(state: AppState) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(state.clone()))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .configure(handlers::configure_routes)
            .default_service(web::to(route_not_found));
    }
}

async fn route_not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound("No route matches this request".to_string()))
}
