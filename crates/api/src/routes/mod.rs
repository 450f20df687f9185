//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod audit_logs;
pub mod budgets;
pub mod health;
pub mod members;
pub mod reports;
pub mod tenants;


/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(tenants::routes())
        .merge(budgets::routes())
        .merge(members::routes())
        .merge(audit_logs::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}
