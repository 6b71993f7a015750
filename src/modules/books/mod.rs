pub mod form;
pub mod models;
pub mod page;
pub mod presenter;
pub mod routes;
pub mod session;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use biblio_kernel::{InitCtx, Module};

use session::BookShelf;

/// Books module: the shelf page plus its JSON API
pub struct BooksModule {
    shelf: Arc<BookShelf>,
}

impl BooksModule {
    pub fn new(shelf: Arc<BookShelf>) -> Self {
        Self { shelf }
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
            backend = ?ctx.settings.store.backend,
            collection = %ctx.settings.store.collection,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::api_router(self.shelf.clone())
    }

    fn pages(&self) -> Router {
        routes::page_router(self.shelf.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
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

fn error_response(description: &str) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    serde_json::json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books, newest first",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "All stored books",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            }
                        },
                        "503": error_response("Record store unavailable")
                    }
                },
                "post": {
                    "summary": "Add a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CreateBook" }
                            }
                        }
                    },
                    "responses": {
                        "201": {
                            "description": "Stored book",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Book" }
                                }
                            }
                        },
                        "422": error_response("Missing title, comment or rating"),
                        "503": error_response("Record store unavailable")
                    }
                }
            },
            "/{id}": {
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [{
                        "name": "id",
                        "in": "path",
                        "required": true,
                        "schema": { "type": "string" }
                    }],
                    "responses": {
                        "204": { "description": "Deleted, or already absent" },
                        "503": error_response("Record store unavailable")
                    }
                }
            },
            "/lookup": {
                "get": {
                    "summary": "Suggest summary, author and cover for a title",
                    "tags": ["Books"],
                    "parameters": [
                        { "name": "title", "in": "query", "required": true, "schema": { "type": "string" } },
                        { "name": "author", "in": "query", "required": false, "schema": { "type": "string" } }
                    ],
                    "responses": {
                        "200": {
                            "description": "Best match",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Suggestion" }
                                }
                            }
                        },
                        "404": error_response("No matching volume"),
                        "422": error_response("Title missing"),
                        "502": error_response("Lookup service unavailable")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
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
                        "id": { "type": "string" },
                        "title": { "type": "string" },
                        "author": { "type": ["string", "null"] },
                        "summary": { "type": ["string", "null"] },
                        "comment": { "type": "string" },
                        "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                        "coverUrl": { "type": ["string", "null"] },
                        "date": { "type": "string", "description": "Local date, DD/MM/YYYY" },
                        "createdAt": { "type": "string", "format": "date-time" }
                    },
                    "required": ["id", "title", "comment", "rating", "date", "createdAt"]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "summary": { "type": "string" },
                        "comment": { "type": "string" },
                        "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                        "coverUrl": { "type": "string" }
                    },
                    "required": ["title", "comment", "rating"]
                },
                "Suggestion": {
                    "type": "object",
                    "properties": {
                        "summary": { "type": ["string", "null"] },
                        "coverUrl": { "type": ["string", "null"] },
                        "author": { "type": ["string", "null"] }
                    }
                }
            }
        }
    })
}

/// Create the books module around a shared shelf
pub fn create_module(shelf: Arc<BookShelf>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(shelf))
}
