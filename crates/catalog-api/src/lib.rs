//! # Catalog API
//!
//! Read services for the card game catalog, backed by a fail-open cache with
//! primary/fallback failover, plus a small operational HTTP surface.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Axum HTTP Server                         │
//! │            (/health, /admin/cache/{entity}/flush)           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       AppContext                            │
//! │          (CacheStack: failover, service, strategies)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Entity Services                         │
//! │        (cache-aside reads over repository traits)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod error;
pub mod services;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use catalog_cache::{CacheEntity, FailoverStatus};

pub use config::Config;
pub use context::AppContext;
pub use error::{ApiError, ApiResult, ServiceError, ServiceResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub cache: FailoverStatus,
}

#[derive(Debug, Serialize)]
pub struct FlushResponse {
    pub flushed: &'static str,
}

/// Health check endpoint. Cache degradation is reported, not failed on.
pub async fn health_check(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: VERSION,
        cache: ctx.cache.failover.status(),
    })
}

/// Drop every cached entry for one entity family
pub async fn flush_cache(
    State(ctx): State<AppContext>,
    Path(entity): Path<String>,
) -> ApiResult<Json<FlushResponse>> {
    let entity: CacheEntity = entity.parse().map_err(|_| ApiError::UnknownResource {
        resource: "cache entity",
        name: entity.clone(),
    })?;

    ctx.cache.flush(entity).await;

    Ok(Json(FlushResponse {
        flushed: entity.as_str(),
    }))
}

/// Build the Axum router
pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/admin/cache/{entity}/flush", post(flush_cache))
        .route("/", get(|| async { "Catalog API" }))
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
}
