pub mod models;
pub mod routes;
pub mod store;

use async_trait::async_trait;
use axum::{
    routing::{get, post},
    Router,
};
use serde_json::json;

use biblio_db::Database;
use biblio_kernel::{InitCtx, Migration, Module};

use store::BookStore;

/// Schema for the `books` table. Shared with store tests.
pub(crate) const BOOKS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        author TEXT NOT NULL,
        year_published INTEGER NOT NULL,
        book_type TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS books_name_idx ON books (name);
";

/// Book catalog module: create/list/edit/delete plus lookup by name.
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

    fn routes(&self, db: &Database) -> Router {
        let store = BookStore::new(db);

        Router::new()
            .route("/", get(routes::list_books))
            .route("/json", get(routes::list_books_json))
            .route("/create", post(routes::create_book))
            .route("/{id}/edit-data", get(routes::get_book_for_edit))
            .route("/{id}/edit", post(routes::edit_book))
            .route("/{id}/delete", post(routes::delete_book))
            .route("/details/{name}", get(routes::book_details))
            .route("/health", get(health_check))
            .with_state(store)
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books (HTML)",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Catalog page",
                                "content": {
                                    "text/html": {
                                        "schema": { "type": "string" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/json": {
                    "get": {
                        "summary": "List books (JSON)",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "books": {
                                                    "type": "array",
                                                    "items": {
                                                        "$ref": "#/components/schemas/Book"
                                                    }
                                                }
                                            },
                                            "required": ["books"]
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/create": {
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/BookForm"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "302": {
                                "description": "Created; redirect to the list page"
                            },
                            "500": {
                                "description": "Invalid form input",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}/edit-data": {
                    "get": {
                        "summary": "Fetch a book's current fields",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "integer" }
                        }],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Book"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Book not found",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}/edit": {
                    "post": {
                        "summary": "Replace a book's fields",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "integer" }
                        }],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/BookForm"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "302": {
                                "description": "Updated; redirect to the list page"
                            },
                            "404": {
                                "description": "Book not found",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "500": {
                                "description": "Invalid form input",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}/delete": {
                    "post": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "integer" }
                        }],
                        "responses": {
                            "302": {
                                "description": "Deleted; redirect to the list page"
                            },
                            "404": {
                                "description": "Book not found",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/details/{name}": {
                    "get": {
                        "summary": "Book details by exact name",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "name",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": {
                                "description": "Details page",
                                "content": {
                                    "text/html": {
                                        "schema": { "type": "string" }
                                    }
                                }
                            },
                            "404": {
                                "description": "Book not found",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
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
                            "id": {
                                "type": "integer",
                                "description": "Storage-assigned identifier"
                            },
                            "name": {
                                "type": "string"
                            },
                            "author": {
                                "type": "string"
                            },
                            "year_published": {
                                "type": "integer"
                            },
                            "book_type": {
                                "type": "string",
                                "enum": ["2days", "5days", "10days"],
                                "description": "Loan-duration tag"
                            }
                        },
                        "required": ["id", "name", "author", "year_published", "book_type"]
                    },
                    "BookForm": {
                        "type": "object",
                        "properties": {
                            "name": {
                                "type": "string"
                            },
                            "author": {
                                "type": "string"
                            },
                            "year_published": {
                                "type": "integer"
                            },
                            "book_type": {
                                "type": "string",
                                "enum": ["2days", "5days", "10days"]
                            }
                        },
                        "required": ["name", "author", "year_published", "book_type"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: BOOKS_SCHEMA,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
