//! Application wiring shared by the `shelf-app` binary and the CLI.

use anyhow::Context;
use axum::Router;

use shelf_db::DbPool;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// A connected, migrated application ready to serve.
pub struct App {
    pub settings: Settings,
    pub registry: ModuleRegistry,
    pub pool: DbPool,
}

impl App {
    /// Connect to the database, register modules and apply pending migrations.
    pub async fn prepare(settings: Settings) -> anyhow::Result<Self> {
        let pool = shelf_db::connect(&settings.database.url, settings.database.max_connections)
            .await
            .with_context(|| format!("failed to connect to database '{}'", settings.database.url))?;

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &pool)?;

        let applied = shelf_db::run_migrations(&pool, &registry.collect_migrations())
            .await
            .context("failed to apply migrations")?;
        tracing::info!(applied, "database schema up to date");

        Ok(Self {
            settings,
            registry,
            pool,
        })
    }

    /// The full HTTP router, without binding a socket.
    pub fn router(&self) -> Router {
        shelf_http::build_router(&self.registry, &self.settings)
    }

    /// Run module lifecycle hooks around the HTTP server.
    pub async fn run(self) -> anyhow::Result<()> {
        let ctx = InitCtx {
            settings: &self.settings,
        };
        self.registry.init_modules(&ctx).await?;
        self.registry.start_modules(&ctx).await?;

        let served = shelf_http::start_server(&self.registry, &self.settings).await;

        self.registry.stop_modules().await?;
        self.pool.close().await;

        served
    }
}

/// Apply pending migrations and exit.
pub async fn migrate(settings: Settings) -> anyhow::Result<()> {
    let app = App::prepare(settings).await?;
    app.pool.close().await;
    Ok(())
}

/// Migrate, then serve until shutdown.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    App::prepare(settings).await?.run().await
}
