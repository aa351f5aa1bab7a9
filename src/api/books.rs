//! Book endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        book::{BookQuery, RemoveQuery, UpdateBookRequest},
        BookResponse, CreateBook,
    },
    AppState,
};

/// Remove result
#[derive(Serialize, Deserialize, ToSchema)]
pub struct RemoveResponse {
    pub title: String,
    /// Whether any book had this title
    pub found: bool,
}

/// Update result
#[derive(Serialize, Deserialize, ToSchema)]
pub struct UpdateResponse {
    pub title: String,
    /// Number of books with this title
    pub matched: u64,
}

/// List every book in the library
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<BookResponse>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<BookResponse>>> {
    let books = state.services.library.list_books().await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// Add a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book added", body = BookResponse),
        (status = 400, description = "Invalid year", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let book = state.services.library.add_book(request).await?;
    Ok((StatusCode::CREATED, Json(book.into())))
}

/// Remove every book with the given title
#[utoipa::path(
    delete,
    path = "/books",
    tag = "books",
    params(RemoveQuery),
    responses(
        (status = 200, description = "Removal result", body = RemoveResponse)
    )
)]
pub async fn remove_book(
    State(state): State<AppState>,
    Query(query): Query<RemoveQuery>,
) -> AppResult<Json<RemoveResponse>> {
    let found = state.services.library.remove_book(&query.title).await?;
    Ok(Json(RemoveResponse {
        title: query.title,
        found,
    }))
}

/// Update read status and/or genre of every book with the given title
#[utoipa::path(
    put,
    path = "/books",
    tag = "books",
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Update result", body = UpdateResponse),
        (status = 501, description = "Storage backend cannot update", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Json(request): Json<UpdateBookRequest>,
) -> AppResult<Json<UpdateResponse>> {
    let matched = state.services.library.update_book(&request).await?;
    Ok(Json(UpdateResponse {
        title: request.title,
        matched,
    }))
}

/// Search books by title or author
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<BookResponse>)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<BookResponse>>> {
    let books = state.services.library.search_books(&query.keyword).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}
