pub mod error;
pub mod models;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_db::BookStore;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

pub use error::BookError;
pub use service::BookService;

/// Book catalog: create, list, comment on and delete books.
pub struct BooksModule {
    service: BookService,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self {
            service: BookService::new(store),
        }
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
            collection = %ctx.settings.database.collection,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
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

/// Create a new instance of the books module
pub fn create_module(store: Arc<dyn BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}

fn message_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "type": "string" }
            }
        }
    })
}

fn schema_response(description: &str, schema: serde_json::Value) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": schema }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let id_param = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": "24 character hexadecimal book id",
        "schema": { "type": "string" }
    });
    let invalid_id = schema_response(
        "Malformed id",
        json!({ "$ref": "#/components/schemas/IdNotFound" }),
    );
    let server_error = schema_response(
        "Internal server error",
        json!({ "$ref": "#/components/schemas/ErrorResponse" }),
    );
    let detail = schema_response(
        "Book with comments, or \"no book exists\"",
        json!({
            "oneOf": [
                { "$ref": "#/components/schemas/BookDetail" },
                { "type": "string" }
            ]
        }),
    );

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "responses": {
                        "200": schema_response(
                            "All books with their comment counts",
                            json!({
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/BookSummary" }
                            }),
                        ),
                        "500": server_error.clone()
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CreateBook" }
                            },
                            "application/x-www-form-urlencoded": {
                                "schema": { "$ref": "#/components/schemas/CreateBook" }
                            }
                        }
                    },
                    "responses": {
                        "200": schema_response(
                            "Created book, or \"missing required field title\"",
                            json!({
                                "oneOf": [
                                    { "$ref": "#/components/schemas/CreatedBook" },
                                    { "type": "string" }
                                ]
                            }),
                        ),
                        "500": server_error.clone()
                    }
                },
                "delete": {
                    "summary": "Delete every book",
                    "tags": ["Books"],
                    "responses": {
                        "200": message_response("\"complete delete successful\""),
                        "500": server_error.clone()
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book with its comments",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "responses": {
                        "200": detail.clone(),
                        "404": invalid_id.clone(),
                        "500": server_error.clone()
                    }
                },
                "post": {
                    "summary": "Add a comment to a book",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/AddComment" }
                            },
                            "application/x-www-form-urlencoded": {
                                "schema": { "$ref": "#/components/schemas/AddComment" }
                            }
                        }
                    },
                    "responses": {
                        "200": detail,
                        "404": invalid_id.clone(),
                        "500": server_error.clone()
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_param],
                    "responses": {
                        "200": message_response("\"delete successful\" or \"no book exists\""),
                        "404": invalid_id,
                        "500": server_error
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "BookSummary": {
                    "type": "object",
                    "properties": {
                        "_id": { "type": "string" },
                        "title": { "type": "string" },
                        "commentcount": { "type": "integer", "minimum": 0 }
                    },
                    "required": ["_id", "title", "commentcount"]
                },
                "CreatedBook": {
                    "type": "object",
                    "properties": {
                        "_id": { "type": "string" },
                        "title": { "type": "string" },
                        "commentcount": { "type": "integer", "minimum": 0 },
                        "comments": { "type": "array", "items": { "type": "string" } }
                    },
                    "required": ["_id", "title", "commentcount", "comments"]
                },
                "BookDetail": {
                    "type": "object",
                    "properties": {
                        "_id": { "type": "string" },
                        "title": { "type": "string" },
                        "comments": { "type": "array", "items": { "type": "string" } }
                    },
                    "required": ["_id", "title", "comments"]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" }
                    }
                },
                "AddComment": {
                    "type": "object",
                    "properties": {
                        "comment": { "type": "string" }
                    }
                },
                "IdNotFound": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string", "example": "ID not found" }
                    },
                    "required": ["message"]
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_db::MemoryBookStore;

    #[test]
    fn module_is_named_after_its_mount_point() {
        let module = create_module(Arc::new(MemoryBookStore::new()));
        assert_eq!(module.name(), "books");
    }

    #[test]
    fn openapi_documents_every_operation() {
        let spec = openapi_fragment();
        for method in ["get", "post", "delete"] {
            assert!(spec["paths"]["/"][method].is_object(), "/ {method}");
            assert!(spec["paths"]["/{id}"][method].is_object(), "/{{id}} {method}");
        }
        assert!(spec["components"]["schemas"]["BookSummary"].is_object());
    }
}
