//! HTTP route definitions.

mod admin;
mod crew_members;
mod health;
mod ships;

use crate::config::Config;
use crate::AppState;
use axum::Router;
use serde::Serialize;

/// Body of responses that carry no record.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub const ACCEPTED: Self = Self {
        message: "accepted",
    };
    pub const CREATED: Self = Self { message: "created" };
}

/// Create all application routes.
///
/// The reset route exists only when the configuration enables it.
pub fn create_routes(config: &Config) -> Router<AppState> {
    let router = Router::new()
        .merge(health::routes())
        .merge(ships::routes())
        .merge(crew_members::routes());

    if config.enable_reset {
        router.merge(admin::routes())
    } else {
        router
    }
}
