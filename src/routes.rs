// src/routes.rs

use axum::{Router, http::Method, routing::post};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{attempt, exam},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Mounts the two exam-engine operations under /api.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (repositories, engines).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let api_routes = Router::new()
        .route("/exams/random", post(exam::generate_random_exam))
        .route("/attempts", post(attempt::create_attempt));

    Router::new()
        .nest("/api", api_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
