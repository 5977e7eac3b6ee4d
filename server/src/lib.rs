//! Fleet Server - REST backend for the fleet admin tool.
//!
//! Serves ships and their crew members over HTTP, persisting them either in
//! PostgreSQL or, when no database is configured, in memory.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod repository;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Pool;
use crate::repository::{CrewRepository, MemoryRepository, PgRepository, ShipRepository};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub ships: Arc<dyn ShipRepository>,
    pub crew: Arc<dyn CrewRepository>,
    pub config: Arc<Config>,
    /// Name of the storage backend, reported by `/health`
    pub storage: &'static str,
}

impl AppState {
    /// State backed by a PostgreSQL pool.
    pub fn postgres(pool: Pool, config: Config) -> Self {
        let repo = Arc::new(PgRepository::new(pool));
        Self {
            ships: repo.clone(),
            crew: repo,
            config: Arc::new(config),
            storage: "postgres",
        }
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(config: Config) -> Self {
        let repo = Arc::new(MemoryRepository::new());
        Self {
            ships: repo.clone(),
            crew: repo,
            config: Arc::new(config),
            storage: "memory",
        }
    }
}

/// Build the router with tracing and permissive CORS.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes(&state.config))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
