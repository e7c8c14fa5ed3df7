//! Defines routes for the inventory service.
//!
//! ## Structure
//! - **Health endpoints** (no authentication)
//!   - `GET  /healthz`: liveness
//!   - `GET  /readyz`: readiness
//!
//! - **Admin endpoints** (network-admin capability required)
//!   - `GET  /`: admin page listing every tenant
//!   - `GET  /tenants`: tenant directory as JSON
//!   - `POST /inventory/list`: one tenant's inventory rows
//!   - `POST /inventory/export`: one tenant's inventory as CSV text

use crate::{
    auth::authenticate,
    handlers::{
        health_handlers::{healthz, readyz},
        inventory_handlers::{admin_page, export_inventory, list_inventory, list_tenants},
    },
    state::AppState,
};
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Build the router without authentication.
///
/// The router carries shared state (`AppState`) to all handlers. Callers
/// are expected to layer something that attaches a `Caller`; see [`app`].
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // admin console
        .route("/", get(admin_page))
        .route("/tenants", get(list_tenants))
        .route("/inventory/list", post(list_inventory))
        .route("/inventory/export", post(export_inventory))
}

/// The full application: routes, bearer-token authentication and state.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(middleware::from_fn_with_state(
            state.admin_tokens.clone(),
            authenticate,
        ))
        .with_state(state)
}
