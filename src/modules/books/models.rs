use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

/// Domain model for the Books module, one row of the `books` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    /// ISBN, the book's unique identifier and primary key
    pub isbn: String,
    /// Amazon product URL
    pub amazon_url: String,
    /// Author of the book
    pub author: String,
    /// Language the book is written in
    pub language: String,
    /// Page count, always positive
    pub pages: i64,
    /// Publisher of the book
    pub publisher: String,
    /// Title of the book
    pub title: String,
    /// Year of publication
    pub year: i64,
}

impl Book {
    /// Apply already-validated partial fields onto this book.
    ///
    /// Only schema-recognized keys are consulted; `isbn` is the row's
    /// identity and never changes through a merge.
    pub fn merge(&mut self, fields: &Map<String, Value>) {
        for (key, value) in fields {
            match key.as_str() {
                "amazon_url" => {
                    if let Some(v) = value.as_str() {
                        self.amazon_url = v.to_string();
                    }
                }
                "author" => {
                    if let Some(v) = value.as_str() {
                        self.author = v.to_string();
                    }
                }
                "language" => {
                    if let Some(v) = value.as_str() {
                        self.language = v.to_string();
                    }
                }
                "pages" => {
                    if let Some(v) = value.as_i64() {
                        self.pages = v;
                    }
                }
                "publisher" => {
                    if let Some(v) = value.as_str() {
                        self.publisher = v.to_string();
                    }
                }
                "title" => {
                    if let Some(v) = value.as_str() {
                        self.title = v.to_string();
                    }
                }
                "year" => {
                    if let Some(v) = value.as_i64() {
                        self.year = v;
                    }
                }
                _ => {}
            }
        }
    }
}
