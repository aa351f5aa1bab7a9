//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, session, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shelf API",
        version = "0.1.0",
        description = "Personal Book Library REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::create_book,
        books::remove_book,
        books::update_book,
        books::search_books,
        // Stats
        stats::get_stats,
        // Session
        session::save,
        session::reload,
        session::exit,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookResponse,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBookRequest,
            crate::models::book::BookQuery,
            crate::models::book::RemoveQuery,
            books::RemoveResponse,
            books::UpdateResponse,
            // Stats
            crate::models::stats::LibraryStats,
            crate::models::stats::StatEntry,
            // Session
            session::ReloadResponse,
            crate::repository::LoadOutcome,
            crate::repository::StorageBackend,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book management"),
        (name = "stats", description = "Statistics"),
        (name = "session", description = "Library persistence")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
