pub mod models;
pub mod routes;
pub mod store;
pub mod validate;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;

use shelf_kernel::{InitCtx, Module};

use self::store::BookStore;

/// Books module: validated CRUD over the in-process book store.
///
/// Access control is deliberately absent; every request is authorized. A
/// calling system that needs it must add its own layer in front.
pub struct BooksModule {
    store: BookStore,
}

impl BooksModule {
    pub fn new() -> Self {
        Self {
            store: BookStore::new(),
        }
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
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

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books (paginated, 10 per page)",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "page",
                            "in": "query",
                            "required": false,
                            "schema": { "type": "integer", "minimum": 1 }
                        }],
                        "responses": {
                            "200": {
                                "description": "Page of books with pagination metadata",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Envelope" }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/StoreBook" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Book created",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Envelope" }
                                    }
                                }
                            },
                            "422": {
                                "description": "Validation failed",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ValidationErrors" }
                                    }
                                }
                            },
                            "500": {
                                "description": "Storage failure",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Envelope" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Fetch a book",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": { "description": "Book" },
                            "404": { "description": "No book with this id" }
                        }
                    },
                    "put": {
                        "summary": "Update a book (all fields optional)",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdateBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": { "description": "Updated book" },
                            "404": { "description": "No book with this id" },
                            "422": { "description": "Validation failed" },
                            "500": { "description": "Storage failure" }
                        }
                    },
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
                            "204": { "description": "Deleted" },
                            "404": { "description": "No book with this id" },
                            "500": { "description": "Storage failure" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "description": "Opaque UUIDv7 token" },
                            "title": { "type": "string", "maxLength": 255 },
                            "author": { "type": "string", "maxLength": 255 },
                            "published_date": { "type": "string", "format": "date" },
                            "genre": { "type": "string", "enum": validate::GENRES },
                            "publisher": { "type": "string" },
                            "created_at": { "type": "string", "format": "date-time" },
                            "updated_at": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "title", "author", "published_date", "genre",
                                     "created_at", "updated_at"]
                    },
                    "StoreBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "maxLength": 255 },
                            "author": { "type": "string", "maxLength": 255 },
                            "published_date": { "type": "string", "format": "date" },
                            "genre": { "type": "string", "enum": validate::GENRES },
                            "publisher": { "type": "string" }
                        },
                        "required": ["title", "author", "published_date", "genre"]
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "maxLength": 255 },
                            "author": { "type": "string", "maxLength": 255 },
                            "published_date": { "type": "string", "format": "date" },
                            "genre": { "type": "string", "enum": validate::GENRES },
                            "publisher": { "type": "string" }
                        }
                    }
                }
            }
        }))
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

/// Create a new instance of the books module.
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_is_named_books() {
        assert_eq!(BooksModule::new().name(), "books");
    }

    #[test]
    fn openapi_fragment_documents_the_resource_paths() {
        let fragment = BooksModule::new().openapi().unwrap();
        assert!(fragment["paths"]["/"]["post"].is_object());
        assert!(fragment["paths"]["/{id}"]["delete"].is_object());
        assert_eq!(
            fragment["components"]["schemas"]["Book"]["properties"]["genre"]["enum"]
                .as_array()
                .map(Vec::len),
            Some(30)
        );
    }
}
