use async_trait::async_trait;
use axum::Router;
use biblio_db::Database;

pub use biblio_db::Migration;

/// Context handed to modules during initialization and startup.
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub db: &'a Database,
}

/// Core trait every biblio module implements.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module; also its mount prefix (`/{name}`).
    fn name(&self) -> &'static str;

    /// Initialize the module. Called during startup, after migrations.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Axum router for this module's routes, mounted under `/{name}`.
    fn routes(&self, _db: &Database) -> Router {
        Router::new()
    }

    /// OpenAPI fragment for this module, merged into the served spec.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Migrations contributed by this module, executed in order.
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Start background work. Called after every module is initialized.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and release resources, during shutdown.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
