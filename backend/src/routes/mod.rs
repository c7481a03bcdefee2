//! Route definitions for the Marketplace Reports service

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - dashboard
        .nest("/dashboard", dashboard_routes(state.clone()))
        // Protected routes - reports and export
        .nest("/reports", report_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(handlers::login))
}

/// Dashboard routes (protected)
fn dashboard_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route("/user-growth", get(handlers::get_user_growth))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Report routes (protected)
fn report_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/metrics", get(handlers::get_metrics))
        .route("/view", get(handlers::get_report_view))
        .route("/trend", get(handlers::get_sales_trend))
        .route("/categories", get(handlers::get_category_distribution))
        .route("/export", post(handlers::export_report))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
