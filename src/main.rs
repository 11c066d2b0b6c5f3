use anyhow::Context;
use shelf_db::Database;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use shelf_app::modules;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load shelf settings")?;

    shelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "shelf-app bootstrap starting"
    );

    let db = Database::connect(&settings.database.url, settings.database.max_connections)
        .await
        .with_context(|| "failed to open database")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };

    registry.init_all(&ctx).await?;

    for module in registry.modules() {
        db.apply_migrations(module.name(), &module.migrations())
            .await?;
    }

    shelf_http::start_server(&registry, &ctx).await?;

    registry.stop_all().await?;
    db.close().await;

    tracing::info!("shelf-app shutdown complete");
    Ok(())
}
