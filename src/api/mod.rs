// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{delete, get, post, put},
    Router,
};

use crate::domain::repositories::TeamStore;
use crate::services::TeamService;
use handlers::{health, teams};
use middleware::JwtSecret;

/// Shared state handed to every handler
pub struct AppState<S: TeamStore> {
    pub service: Arc<TeamService<S>>,
    pub jwt_secret: JwtSecret,
    pub conflict_retry_attempts: u32,
}

impl<S: TeamStore> AppState<S> {
    pub fn new(
        service: TeamService<S>,
        jwt_secret: JwtSecret,
        conflict_retry_attempts: u32,
    ) -> Self {
        Self {
            service: Arc::new(service),
            jwt_secret,
            conflict_retry_attempts,
        }
    }
}

impl<S: TeamStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            jwt_secret: self.jwt_secret.clone(),
            conflict_retry_attempts: self.conflict_retry_attempts,
        }
    }
}

impl<S: TeamStore> FromRef<AppState<S>> for JwtSecret {
    fn from_ref(state: &AppState<S>) -> Self {
        state.jwt_secret.clone()
    }
}

/// Builds the application router over any team store
pub fn router<S: TeamStore>(state: AppState<S>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Team routes
        .route(
            "/api/teams",
            post(teams::create_team::<S>).get(teams::list_my_teams::<S>),
        )
        .route(
            "/api/teams/:id",
            get(teams::get_team::<S>).put(teams::update_team::<S>),
        )
        .route(
            "/api/teams/:id/members",
            get(teams::list_team_members::<S>).post(teams::join_team::<S>),
        )
        .route(
            "/api/teams/:id/members/:member_id",
            delete(teams::remove_team_member::<S>),
        )
        .route("/api/teams/:id/leader", put(teams::delegate_leader::<S>))
        .route("/api/teams/:id/leave", post(teams::leave_team::<S>))
        // Shared state
        .with_state(state)
}
