use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use biblio_http::error::AppError;
use biblio_lookup::{LookupError, LookupOutcome, LookupQuery, Suggestion};
use biblio_store::BookRecord;

use super::{store_error, validation_error};
use crate::modules::books::models::{CreateBook, LookupParams};
use crate::modules::books::session::BookShelf;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "books module is healthy"
}

/// All records, newest first
pub async fn list_books(
    State(shelf): State<Arc<BookShelf>>,
) -> Result<Json<Vec<BookRecord>>, AppError> {
    let records = shelf.store().list().await.map_err(store_error)?;
    Ok(Json(records))
}

pub async fn create_book(
    State(shelf): State<Arc<BookShelf>>,
    Json(body): Json<CreateBook>,
) -> Result<(StatusCode, Json<BookRecord>), AppError> {
    let draft = body.into_draft().map_err(validation_error)?;
    let record = shelf.store().create(draft).await.map_err(store_error)?;

    tracing::info!(id = %record.id, "book created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// Idempotent: deleting an unknown id still answers 204
pub async fn delete_book(
    State(shelf): State<Arc<BookShelf>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    shelf.store().delete(&id).await.map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn lookup(
    State(shelf): State<Arc<BookShelf>>,
    Query(params): Query<LookupParams>,
) -> Result<Json<Suggestion>, AppError> {
    let query = LookupQuery::new(&params.title, params.author.as_deref()).map_err(|e| {
        AppError::validation(
            vec![serde_json::json!({ "field": "title", "error": "required" })],
            e.to_string(),
        )
    })?;

    match shelf.lookup().search(&query).await {
        Ok(LookupOutcome::Found(suggestion)) => Ok(Json(suggestion)),
        Ok(LookupOutcome::NotFound) => Err(AppError::not_found(format!(
            "no volume matches '{}'",
            query.expression()
        ))),
        Err(LookupError::MissingTitle) => Err(AppError::bad_request("a title is required")),
        Err(e) => Err(AppError::bad_gateway("lookup_unavailable", e.to_string())),
    }
}
