//! HTTP handlers for the books collection and single-book resources.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use shelf_http::error::AppError;

use super::models::{Book, BookInput};
use super::store::{BookStore, StoreError};
use super::validation::{self, Violation};

/// Shared handler state
#[derive(Clone)]
pub struct BooksState {
    pub store: Arc<dyn BookStore>,
}

/// Confirmation body for a successful delete
#[derive(Debug, Serialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

/// Routes relative to the module mount point
pub fn router(store: Arc<dyn BookStore>) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(BooksState { store })
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(State(state): State<BooksState>) -> Result<Json<Vec<Book>>, AppError> {
    let books = state
        .store
        .list()
        .await
        .map_err(|err| storage_failure("Failed to fetch books", err))?;
    Ok(Json(books))
}

async fn create_book(
    State(state): State<BooksState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let input = validated(payload)?;

    let book = state
        .store
        .create(&input)
        .await
        .map_err(|err| storage_failure("Failed to create book", err))?;

    tracing::info!(book_id = %book.id, title = %book.title, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn get_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let book = state
        .store
        .read(&id)
        .await
        .map_err(|err| store_error("Failed to fetch book", err))?;
    Ok(Json(book))
}

async fn update_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let input = validated(payload)?;

    let book = state
        .store
        .update(&id, &input)
        .await
        .map_err(|err| store_error("Failed to update book", err))?;

    tracing::info!(book_id = %book.id, "book updated");
    Ok(Json(book))
}

async fn delete_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteConfirmation>, AppError> {
    state
        .store
        .delete(&id)
        .await
        .map_err(|err| store_error("Failed to delete book", err))?;

    tracing::info!(book_id = %id, "book deleted");
    Ok(Json(DeleteConfirmation {
        message: "Book deleted successfully".to_string(),
    }))
}

/// Run the schema rules over a JSON body.
fn validated(payload: Result<Json<Value>, JsonRejection>) -> Result<BookInput, AppError> {
    let Json(body) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    validation::validate(&body).map_err(invalid_book)
}

fn invalid_book(violations: Vec<Violation>) -> AppError {
    let details = violations
        .iter()
        .filter_map(|violation| serde_json::to_value(violation).ok())
        .collect();
    AppError::validation(details, "Invalid book")
}

/// Map a store error on a single-record operation.
fn store_error(context: &'static str, err: StoreError) -> AppError {
    match err {
        StoreError::NotFound(id) => {
            tracing::debug!(book_id = %id, "book not found");
            AppError::not_found("Book not found")
        }
        other => storage_failure(context, other),
    }
}

fn storage_failure(context: &'static str, err: StoreError) -> AppError {
    AppError::internal(context, err)
}
