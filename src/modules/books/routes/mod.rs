//! HTTP handlers for the Books module.
//!
//! Pipeline per request: validate body → repository call → serialize.
//! Repository errors are translated to the HTTP error taxonomy here.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};

use shelf_http::error::AppError;

use super::repository::{BookRepository, RepoError};
use super::schema::{self, Mode};
use super::models::Book;

/// Build the module router with its repository as shared state.
pub fn router(repo: BookRepository) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{isbn}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(repo)
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Conflict { .. } => AppError::conflict(err.to_string()),
            RepoError::NotFound { .. } => AppError::not_found(err.to_string()),
            RepoError::Storage(storage_err) => AppError::Internal(storage_err.into()),
        }
    }
}

/// `POST /books` — validate the full payload, insert, respond 201.
async fn create_book(
    State(repo): State<BookRepository>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let input = as_object(&body)?;

    schema::validate(input, Mode::Create)
        .map_err(|details| AppError::validation(details, "book payload failed validation"))?;

    // Unknown keys are dropped before the payload is materialized.
    let book: Book = serde_json::from_value(Value::Object(schema::recognized_fields(input)))
        .map_err(|err| AppError::Internal(err.into()))?;

    let stored = repo.create(&book).await?;

    Ok((StatusCode::CREATED, Json(json!({ "book": stored }))))
}

/// `GET /books`
async fn list_books(State(repo): State<BookRepository>) -> Result<Json<Value>, AppError> {
    let books = repo.get_all().await?;
    Ok(Json(json!({ "books": books })))
}

/// `GET /books/{isbn}`
async fn get_book(
    State(repo): State<BookRepository>,
    Path(isbn): Path<String>,
) -> Result<Json<Value>, AppError> {
    let book = repo.get_by_isbn(&isbn).await?;
    Ok(Json(json!({ "book": book })))
}

/// `PUT /books/{isbn}` — partial update; only supplied, schema-recognized
/// fields are validated and applied. An empty body is a no-op.
async fn update_book(
    State(repo): State<BookRepository>,
    Path(isbn): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let input = as_object(&body)?;

    schema::validate(input, Mode::Update)
        .map_err(|details| AppError::validation(details, "book payload failed validation"))?;

    let book = repo.update(&isbn, &schema::recognized_fields(input)).await?;

    Ok(Json(json!({ "book": book })))
}

/// `DELETE /books/{isbn}`
async fn delete_book(
    State(repo): State<BookRepository>,
    Path(isbn): Path<String>,
) -> Result<Json<Value>, AppError> {
    repo.delete(&isbn).await?;
    Ok(Json(json!({ "message": "Book deleted" })))
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, AppError> {
    body.as_object().ok_or_else(|| {
        AppError::validation(
            vec!["request body must be a JSON object".to_string()],
            "book payload failed validation",
        )
    })
}
