//! HTTP handlers for the book resource.
//!
//! Each handler resolves its inputs, calls validation and the store
//! explicitly, and shapes the outcome into the uniform envelope. Unexpected
//! store failures during a mutation surface as 500 with an
//! operation-specific message; nothing is retried.

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::{Timestamp, Uuid};

use shelf_http::{
    respond::{self, Page},
    AppError,
};

use super::models::Book;
use super::store::{BookStore, StoreError};
use super::validate;

/// Fixed page size for listings.
pub const PAGE_SIZE: u64 = 10;

const BASE_PATH: &str = "/api/books";
const NOT_FOUND_MESSAGE: &str = "Book not found";

/// Build the books router with the store attached as state.
pub fn router(books: BookStore) -> Router {
    Router::new()
        .route("/", get(index).post(store))
        .route(
            "/{id}",
            get(show).put(update).patch(update).delete(destroy),
        )
        .route("/health", get(health_check))
        .with_state(books)
}

#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    page: Option<String>,
}

impl ListQuery {
    /// Malformed or out-of-range page values fall back to page 1.
    fn page(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|&page| page >= 1)
            .unwrap_or(1)
    }
}

/// GET / — paginated listing in creation order.
async fn index(
    State(books): State<BookStore>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let page = query.page();
    let (items, total) = books.page(page, PAGE_SIZE).map_err(unexpected)?;

    Ok(respond::ok(
        "Books retrieved successfully",
        Page::new(items, total, page, PAGE_SIZE, BASE_PATH),
    ))
}

/// GET /{id}
async fn show(
    State(books): State<BookStore>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let book = books
        .get(&id)
        .map_err(unexpected)?
        .ok_or_else(|| AppError::not_found(NOT_FOUND_MESSAGE))?;

    Ok(respond::ok("Book retrieved successfully", book))
}

/// POST / — create-validation, then insert.
async fn store(
    State(books): State<BookStore>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    let input = as_input_map(body);

    let new_book = validate::validate_create(&input, |title| {
        books.title_taken(title).unwrap_or(false)
    })
    .map_err(AppError::validation)?;

    let now = OffsetDateTime::now_utc();
    let book = Book {
        id: Uuid::new_v7(Timestamp::now(uuid::NoContext)).to_string(),
        title: new_book.title,
        author: new_book.author,
        published_date: new_book.published_date,
        genre: new_book.genre,
        publisher: new_book.publisher,
        created_at: now,
        updated_at: now,
    };

    // The store's own unique check is the backstop; a violation surfacing
    // here went past the validation pre-check and is a storage failure.
    let book = books
        .insert(book)
        .map_err(|e| AppError::storage("Book not created", e))?;

    tracing::info!(book_id = %book.id, "book created");

    Ok(respond::created("Book created successfully", book))
}

/// PUT/PATCH /{id} — resolve the id first, then update-validation, then merge.
async fn update(
    State(books): State<BookStore>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    if books.get(&id).map_err(unexpected)?.is_none() {
        return Err(AppError::not_found(NOT_FOUND_MESSAGE));
    }

    let patch = validate::validate_update(&as_input_map(body)).map_err(AppError::validation)?;

    let book = books
        .update(&id, patch)
        .map_err(|e| AppError::storage("Book not updated", e))?
        .ok_or_else(|| AppError::not_found(NOT_FOUND_MESSAGE))?;

    tracing::info!(book_id = %book.id, "book updated");

    Ok(respond::ok("Book updated successfully", book))
}

/// DELETE /{id} — hard delete, 204 on success.
async fn destroy(
    State(books): State<BookStore>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    books
        .remove(&id)
        .map_err(|e| AppError::storage("Book not deleted", e))?
        .ok_or_else(|| AppError::not_found(NOT_FOUND_MESSAGE))?;

    tracing::info!(book_id = %id, "book deleted");

    Ok(respond::no_content())
}

/// Module liveness endpoint.
async fn health_check() -> &'static str {
    "books module is healthy"
}

/// A non-object body validates like an empty one: every required field is
/// reported missing.
fn as_input_map(body: Value) -> Map<String, Value> {
    match body {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn unexpected(err: StoreError) -> AppError {
    AppError::Internal(err.into())
}
