//! HTTP server facade for shelf: Axum router assembly, error mapping, and
//! response envelopes.

use anyhow::Context;
use axum::{routing::get, Router};

use shelf_kernel::ModuleRegistry;

pub mod error;
pub mod respond;
pub mod router;

pub use error::{AppError, FieldError};

use router::RouterBuilder;

/// Bind and serve the HTTP API for the given module registry.
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &shelf_kernel::settings::Settings,
) -> anyhow::Result<()> {
    let app = build_router(registry, settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    tracing::info!("HTTP server listening on http://{addr}");

    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}

/// Assemble the main router: global middleware, health check, module mounts,
/// and the merged OpenAPI document.
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &shelf_kernel::settings::Settings,
) -> Router {
    let mut builder = RouterBuilder::new()
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .route("/healthz", get(health_check));

    for module in registry.modules() {
        tracing::info!(module = module.name(), "mounting module routes");
        builder = builder.mount_module(module.name(), module.routes());
    }

    builder.with_openapi(registry).build()
}

/// Liveness endpoint.
async fn health_check() -> &'static str {
    "ok"
}
