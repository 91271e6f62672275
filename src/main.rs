mod modules;

use anyhow::Context;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load shelf settings")?;

    shelf_telemetry::init(&settings.telemetry);

    tracing::info!(env = ?settings.environment, "shelf-app bootstrap starting");

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    shelf_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;

    tracing::info!("shelf-app shut down");
    Ok(())
}
