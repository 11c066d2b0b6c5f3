pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{InitCtx, Migration, Module};

use repository::BookRepository;

/// Schema for the `books` table. `isbn` is the primary key; the storage
/// layer's uniqueness constraint backs the 409 contract.
pub const BOOKS_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        isbn       TEXT PRIMARY KEY,
        amazon_url TEXT NOT NULL,
        author     TEXT NOT NULL,
        language   TEXT NOT NULL,
        pages      INTEGER NOT NULL,
        publisher  TEXT NOT NULL,
        title      TEXT NOT NULL,
        year       INTEGER NOT NULL
    );
"#;

/// Books module: CRUD over the book catalog with schema validation.
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self, ctx: &InitCtx<'_>) -> Router {
        routes::router(BookRepository::new(ctx.db.pool().clone()))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": { "description": "All books, wrapped as {books: [...]}" }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Book" }
                                }
                            }
                        },
                        "responses": {
                            "201": { "description": "Created book, wrapped as {book}" },
                            "400": {
                                "description": "Validation failed",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "409": {
                                "description": "A book with this isbn already exists",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{isbn}": {
                    "get": {
                        "summary": "Get a book by isbn",
                        "tags": ["Books"],
                        "responses": {
                            "200": { "description": "The book, wrapped as {book}" },
                            "404": {
                                "description": "No book with this isbn",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "put": {
                        "summary": "Partially update a book",
                        "description": "Only supplied schema fields are validated and applied; unknown keys are dropped; an empty body is a no-op.",
                        "tags": ["Books"],
                        "responses": {
                            "200": { "description": "The merged book, wrapped as {book}" },
                            "400": {
                                "description": "Validation failed",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with this isbn",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": { "description": "Confirmation, wrapped as {message}" },
                            "404": {
                                "description": "No book with this isbn",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "isbn": {
                                "type": "string",
                                "description": "Unique identifier for the book"
                            },
                            "amazon_url": {
                                "type": "string",
                                "format": "uri",
                                "description": "Amazon product URL"
                            },
                            "author": {
                                "type": "string",
                                "description": "Author of the book"
                            },
                            "language": {
                                "type": "string",
                                "description": "Language the book is written in"
                            },
                            "pages": {
                                "type": "integer",
                                "minimum": 1,
                                "description": "Page count"
                            },
                            "publisher": {
                                "type": "string",
                                "description": "Publisher of the book"
                            },
                            "title": {
                                "type": "string",
                                "description": "Title of the book"
                            },
                            "year": {
                                "type": "integer",
                                "description": "Year of publication"
                            }
                        },
                        "required": [
                            "isbn", "amazon_url", "author", "language",
                            "pages", "publisher", "title", "year"
                        ]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: BOOKS_TABLE_SQL,
        }]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
