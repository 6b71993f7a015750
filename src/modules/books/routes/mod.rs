//! HTTP handlers for the books module.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use biblio_http::error::AppError;
use biblio_store::{StoreError, ValidationError};
use serde_json::json;

use super::session::BookShelf;

pub mod api;
pub mod pages;

/// JSON routes, mounted under `/api/books`.
pub fn api_router(shelf: Arc<BookShelf>) -> Router {
    Router::new()
        .route("/", get(api::list_books).post(api::create_book))
        .route("/{id}", delete(api::delete_book))
        .route("/lookup", get(api::lookup))
        .route("/health", get(api::health_check))
        .with_state(shelf)
}

/// HTML page and its form actions, merged at the root.
pub fn page_router(shelf: Arc<BookShelf>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/books", post(pages::add_book))
        .route("/books/{id}/delete", post(pages::delete_book))
        .route("/lookup", post(pages::lookup))
        .with_state(shelf)
}

fn field_of(error: &ValidationError) -> &'static str {
    match error {
        ValidationError::MissingTitle => "title",
        ValidationError::MissingComment => "comment",
        ValidationError::MissingRating | ValidationError::RatingOutOfRange(_) => "rating",
        ValidationError::SummaryTooLong(_) => "summary",
    }
}

pub(crate) fn validation_error(error: ValidationError) -> AppError {
    AppError::validation(
        vec![json!({ "field": field_of(&error), "error": error.to_string() })],
        error.to_string(),
    )
}

pub(crate) fn store_error(error: StoreError) -> AppError {
    match error {
        StoreError::Validation(v) => validation_error(v),
        other => AppError::unavailable("store_unavailable", other.to_string()),
    }
}
