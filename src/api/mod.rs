//! API handlers for Shelf REST endpoints

pub mod books;
pub mod health;
pub mod openapi;
pub mod session;
pub mod stats;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route(
            "/books",
            get(books::list_books)
                .post(books::create_book)
                .put(books::update_book)
                .delete(books::remove_book),
        )
        .route("/books/search", get(books::search_books))
        // Statistics
        .route("/stats", get(stats::get_stats))
        // Session
        .route("/session/save", post(session::save))
        .route("/session/reload", post(session::reload))
        .route("/session/exit", post(session::exit))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
