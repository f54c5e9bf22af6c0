//! HTTP route entry point for `/api/...`.
//!
//! - `/health` → liveness (public)
//! - `/attendance` → check-in sessions and scanning (authenticated)
//! - `/activities/{activity_id}/attendance` → ledger reads and bulk submission (authenticated)
//! - `/members/{member_id}/attendance` → member summary (authenticated)

use crate::auth::guards::allow_authenticated;
use crate::routes::{
    activities::activities_routes, attendance::attendance_routes, health::health_routes,
    members::members_routes,
};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod activities;
pub mod attendance;
pub mod common;
pub mod health;
pub mod members;

/// Builds the complete `/api` router with its state applied.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest(
            "/attendance",
            attendance_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/activities",
            activities_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/members",
            members_routes().route_layer(from_fn(allow_authenticated)),
        )
        .with_state(app_state)
}
