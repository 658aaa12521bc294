//! Vehicle catalog backend
//!
//! API HTTP para un catálogo de vehículos: usuarios, vehículos con
//! imágenes, wishlist, galería independiente y estadísticas.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, limit::RequestBodyLimitLayer, services::ServeDir,
    timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::{database::ping, middleware::cors::cors_layer, state::AppState};

pub const API_PREFIX: &str = "/api/v1";

/// Construye la aplicación completa con sus capas
pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/health", get(health))
        .route(API_PREFIX, get(api_root))
        .route("/api/v1/", get(api_root))
        .nest(API_PREFIX, routes::create_api_router(state.clone()))
        .nest_service("/media", ServeDir::new(&config.media_root))
        // El límite por defecto de Axum (2 MB) se sustituye por MAX_BODY_SIZE
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check con comprobación de la base de datos
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "❌ Health check: base de datos no disponible");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "database": "unavailable",
                    "version": env!("CARGO_PKG_VERSION"),
                })),
            )
        }
    }
}

/// Índice de endpoints
async fn api_root() -> Json<Value> {
    Json(json!({
        "name": "Vehicle Catalog API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": {
                "register": "POST /api/v1/auth/register",
                "login": "POST /api/v1/auth/login",
                "logout": "POST /api/v1/auth/logout",
                "profile": "GET /api/v1/auth/profile",
            },
            "vehicles": {
                "list": "GET /api/v1/vehicles",
                "create": "POST /api/v1/vehicles",
                "detail": "GET /api/v1/vehicles/{id}",
                "update": "PUT|PATCH /api/v1/vehicles/{id}",
                "delete": "DELETE /api/v1/vehicles/{id}",
                "images": "GET|POST /api/v1/vehicles/{id}/images",
                "set_primary_image": "POST /api/v1/vehicles/{id}/images/{image_id}/primary",
                "delete_image": "DELETE /api/v1/vehicles/{id}/images/{image_id}",
                "stats": "GET /api/v1/vehicles/stats",
            },
            "wishlist": {
                "list": "GET /api/v1/vehicles/wishlist",
                "add": "POST /api/v1/vehicles/wishlist",
                "toggle": "POST /api/v1/vehicles/{id}/wishlist/toggle",
                "remove": "DELETE /api/v1/vehicles/{id}/wishlist/remove",
            },
            "gallery": {
                "random": "GET /api/v1/vehicles/gallery?limit=50",
                "create": "POST /api/v1/vehicles/gallery",
                "detail": "GET|PUT|PATCH|DELETE /api/v1/vehicles/gallery/{id}",
            },
        },
    }))
}
