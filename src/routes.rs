// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeFile,
    trace::TraceLayer,
};

use crate::{
    handlers::{dashboard, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * `/api/submit` for the quiz page, `/api/dashboard/*` for the admin board.
/// * Serves the two HTML pages from `static_dir`.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let dashboard_routes = Router::new()
        .route("/stats", get(dashboard::get_stats))
        .route("/students", get(dashboard::list_students))
        .route("/students/{id}", delete(dashboard::delete_student));

    let static_dir = &state.config.static_dir;
    let pages = Router::new()
        .route_service("/", ServeFile::new(static_dir.join("test.html")))
        .route_service("/dashboard", ServeFile::new(static_dir.join("dashboard.html")));

    Router::new()
        .route("/api/submit", post(quiz::submit_result))
        .nest("/api/dashboard", dashboard_routes)
        .merge(pages)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
