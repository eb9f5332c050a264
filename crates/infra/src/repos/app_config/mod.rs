mod inmemory;
mod postgres;

pub use inmemory::InMemoryAppConfigRepo;
pub use postgres::PostgresAppConfigRepo;

/// A single operator editable setting, e.g. a prompt template
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfigEntry {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

#[async_trait::async_trait]
pub trait IAppConfigRepo: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<AppConfigEntry>>;
    async fn upsert(&self, entry: &AppConfigEntry) -> anyhow::Result<()>;
}
