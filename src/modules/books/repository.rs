//! Data access for the `books` table.
//!
//! Storage errors about uniqueness and existence are translated into the
//! domain error taxonomy at this boundary; everything else stays a raw
//! storage error for the handler layer to map to a 500.

use serde_json::{Map, Value};
use sqlx::SqlitePool;
use thiserror::Error;

use super::models::Book;

/// Errors surfaced by repository operations
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("book {isbn} already exists")]
    Conflict { isbn: String },

    #[error("no book found with isbn {isbn}")]
    NotFound { isbn: String },

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

const ALL_COLUMNS: &str = "isbn, amazon_url, author, language, pages, publisher, title, year";

/// CRUD operations over the `books` table, keyed by ISBN.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new book. The primary-key constraint enforces uniqueness;
    /// its violation surfaces as [`RepoError::Conflict`].
    pub async fn create(&self, book: &Book) -> Result<Book, RepoError> {
        let result = sqlx::query(
            "INSERT INTO books (isbn, amazon_url, author, language, pages, publisher, title, year) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(book.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(RepoError::Conflict {
                    isbn: book.isbn.clone(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// All books, ordered by isbn for deterministic listings.
    pub async fn get_all(&self) -> Result<Vec<Book>, RepoError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {ALL_COLUMNS} FROM books ORDER BY isbn"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    pub async fn get_by_isbn(&self, isbn: &str) -> Result<Book, RepoError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {ALL_COLUMNS} FROM books WHERE isbn = ?1"
        ))
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        book.ok_or_else(|| RepoError::NotFound {
            isbn: isbn.to_string(),
        })
    }

    /// Merge already-validated partial fields onto the stored row and
    /// persist the result. Fields absent from `fields` keep their prior
    /// values; an empty map leaves the row untouched.
    pub async fn update(
        &self,
        isbn: &str,
        fields: &Map<String, Value>,
    ) -> Result<Book, RepoError> {
        let mut book = self.get_by_isbn(isbn).await?;
        book.merge(fields);

        sqlx::query(
            "UPDATE books SET amazon_url = ?1, author = ?2, language = ?3, pages = ?4, \
             publisher = ?5, title = ?6, year = ?7 WHERE isbn = ?8",
        )
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .bind(isbn)
        .execute(&self.pool)
        .await?;

        Ok(book)
    }

    pub async fn delete(&self, isbn: &str) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?1")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound {
                isbn: isbn.to_string(),
            });
        }

        Ok(())
    }
}
