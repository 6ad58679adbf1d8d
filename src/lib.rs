//! biblio application library.
//!
//! Wires the book-catalog modules into the biblio kernel and drives the
//! bootstrap sequence: settings, database, migrations, module lifecycle,
//! HTTP server.

pub mod modules;

use anyhow::Context;

use biblio_db::{Database, DatabaseConfig};
use biblio_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Open the database described by the settings.
pub async fn connect_database(settings: &Settings) -> anyhow::Result<Database> {
    let config = DatabaseConfig::new(&settings.database.url)
        .max_connections(settings.database.max_connections);
    Database::connect(&config)
        .await
        .context("failed to open database")
}

/// Build a registry holding every application module.
pub fn build_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}

/// Run the application until the server exits, then stop modules.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let db = connect_database(&settings).await?;
    let registry = build_registry();

    db.apply_migrations(&registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = biblio_http::start_server(&registry, &settings, &db).await;

    registry.stop_all().await?;

    served
}
