//! Router assembly for the shelf HTTP server.

use axum::{extract::Request, http::HeaderValue, routing::get, Router};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::{Timestamp, Uuid};

use shelf_kernel::ModuleRegistry;

/// Builder for the main HTTP router: middleware, module mounts, API docs.
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Add a bare route to the router.
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount a module's router under `/api/{module_name}`.
    pub fn mount_module(mut self, module_name: &str, module_router: Router) -> Self {
        self.router = self
            .router
            .nest(&format!("/api/{module_name}"), module_router);
        self
    }

    /// Request/response tracing middleware.
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Permissive CORS middleware.
    pub fn with_cors(mut self) -> Self {
        self.router = self.router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
        self
    }

    /// Attach a UUIDv7 `x-request-id` to every request.
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        self
    }

    /// Per-request timeout middleware.
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.router = self
            .router
            .layer(TimeoutLayer::new(Duration::from_millis(timeout_ms)));
        self
    }

    /// Merge module OpenAPI fragments into one document and serve it through
    /// Swagger UI plus a raw JSON endpoint.
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let mut spec = base_openapi_spec();

        for module in registry.modules() {
            if let Some(fragment) = module.openapi() {
                merge_module_fragment(&mut spec, module.name(), &fragment);
            }
        }

        let openapi_obj: utoipa::openapi::OpenApi =
            serde_json::from_value(spec.clone()).unwrap_or_else(|_| {
                utoipa::openapi::OpenApiBuilder::new()
                    .info(
                        utoipa::openapi::InfoBuilder::new()
                            .title("Shelf API")
                            .version("1.0.0")
                            .build(),
                    )
                    .build()
            });

        self.router = self.router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi_obj),
        );

        // Raw merged spec for external consumers.
        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { axum::Json(spec.clone()) }),
        );

        self
    }

    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Skeleton OpenAPI document all module fragments merge into.
fn base_openapi_spec() -> serde_json::Value {
    serde_json::json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Shelf API",
            "version": "1.0.0",
            "description": "Validated book catalog REST service"
        },
        "paths": {
            "/healthz": {
                "get": {
                    "summary": "Health check",
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "text/plain": {
                                    "schema": { "type": "string" }
                                }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Envelope": {
                    "type": "object",
                    "properties": {
                        "status": { "type": "string", "enum": ["success", "error"] },
                        "message": { "type": "string" },
                        "data": {}
                    },
                    "required": ["status", "message"]
                },
                "ValidationErrors": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" },
                        "errors": {
                            "type": "object",
                            "additionalProperties": {
                                "type": "array",
                                "items": { "type": "string" }
                            }
                        }
                    },
                    "required": ["message", "errors"]
                }
            }
        }
    })
}

/// Fold one module's fragment into the service-wide document. Module paths
/// are prefixed with the module's `/api/{name}` mount point.
fn merge_module_fragment(
    spec: &mut serde_json::Value,
    module_name: &str,
    fragment: &serde_json::Value,
) {
    if let Some(paths) = fragment.get("paths").and_then(|p| p.as_object()) {
        for (path, item) in paths {
            let suffix = if path == "/" { "" } else { path.as_str() };
            spec["paths"][format!("/api/{module_name}{suffix}")] = item.clone();
        }
    }

    if let Some(schemas) = fragment
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(|s| s.as_object())
    {
        for (name, schema) in schemas {
            spec["components"]["schemas"][name] = schema.clone();
        }
    }
}

/// UUIDv7 request id generator.
#[derive(Clone)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let request_id = Uuid::new_v7(Timestamp::now(uuid::NoContext))
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    #[tokio::test]
    async fn builder_assembles_with_all_middleware() {
        let _router = RouterBuilder::new()
            .with_tracing()
            .with_cors()
            .with_request_id()
            .with_timeout(5000)
            .route("/healthz", get(|| async { "ok" }))
            .build();
    }

    #[tokio::test]
    async fn module_router_mounts_under_api_prefix() {
        let module_router = Router::new().route("/", get(|| async { "books" }));

        let _router = RouterBuilder::new()
            .mount_module("books", module_router)
            .build();
    }

    #[test]
    fn fragment_paths_are_prefixed_with_module_mount() {
        let mut spec = base_openapi_spec();
        let fragment = serde_json::json!({
            "paths": {
                "/": { "get": { "summary": "List books" } },
                "/{id}": { "get": { "summary": "Fetch a book" } }
            },
            "components": {
                "schemas": {
                    "Book": { "type": "object" }
                }
            }
        });

        merge_module_fragment(&mut spec, "books", &fragment);

        assert!(spec["paths"]["/api/books"].is_object());
        assert!(spec["paths"]["/api/books/{id}"].is_object());
        assert!(spec["components"]["schemas"]["Book"].is_object());
    }
}
