mod app_config;
mod event;
mod shared;

pub use app_config::{AppConfigEntry, IAppConfigRepo};
use app_config::{InMemoryAppConfigRepo, PostgresAppConfigRepo};
pub use event::IEventRepo;
use event::{InMemoryEventRepo, PostgresEventRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub events: Arc<dyn IEventRepo>,
    pub app_config: Arc<dyn IAppConfigRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        Ok(Self {
            events: Arc::new(PostgresEventRepo::new(pool.clone())),
            app_config: Arc::new(PostgresAppConfigRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            events: Arc::new(InMemoryEventRepo::new()),
            app_config: Arc::new(InMemoryAppConfigRepo::new()),
        }
    }
}
