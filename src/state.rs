use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    catalog::builtin_chapters,
    config::Config,
    db::{PgStore, chapter::seed_chapters, memory::MemoryStore},
};

pub struct AppState<B> {
    pub backend: B,
    pub config: Config,
}

pub type SharedAppState<B> = Arc<AppState<B>>;

impl<B> AppState<B> {
    pub fn new(backend: B, config: Config) -> Self {
        AppState { backend, config }
    }
}

impl AppState<PgStore> {
    pub async fn postgres(config: Config) -> Result<Self, anyhow::Error> {
        let pool = PgPoolOptions::new()
            .min_connections(5)
            .max_connections(30)
            .connect_lazy_with(config.database.with_db());

        if config.application.run_migration {
            tracing::warn!("Running database migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;

            let chapters = builtin_chapters().context("Failed to read the chapter catalog.")?;
            let inserted = seed_chapters(&pool, &chapters)
                .await
                .context("Failed to seed chapters.")?;
            tracing::info!(inserted, "Chapter catalog seeded");
        }

        Ok(AppState::new(PgStore::new(pool), config))
    }
}

impl AppState<MemoryStore> {
    pub async fn memory(config: Config) -> Result<Self, anyhow::Error> {
        let chapters = builtin_chapters().context("Failed to read the chapter catalog.")?;
        tracing::warn!("Using in-memory storage, data is lost on shutdown");

        Ok(AppState::new(MemoryStore::with_chapters(chapters).await, config))
    }
}
