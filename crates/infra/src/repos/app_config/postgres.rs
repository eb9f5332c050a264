use super::{AppConfigEntry, IAppConfigRepo};
use sqlx::{FromRow, PgPool};

pub struct PostgresAppConfigRepo {
    pool: PgPool,
}

impl PostgresAppConfigRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AppConfigRaw {
    config_key: String,
    config_value: String,
    description: Option<String>,
}

impl From<AppConfigRaw> for AppConfigEntry {
    fn from(raw: AppConfigRaw) -> Self {
        Self {
            key: raw.config_key,
            value: raw.config_value,
            description: raw.description,
        }
    }
}

#[async_trait::async_trait]
impl IAppConfigRepo for PostgresAppConfigRepo {
    async fn find_all(&self) -> anyhow::Result<Vec<AppConfigEntry>> {
        let rows: Vec<AppConfigRaw> =
            sqlx::query_as("SELECT config_key, config_value, description FROM app_config")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(AppConfigEntry::from).collect())
    }

    async fn upsert(&self, entry: &AppConfigEntry) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO app_config(config_key, config_value, description)
            VALUES($1, $2, $3)
            ON CONFLICT (config_key) DO UPDATE
            SET config_value = EXCLUDED.config_value, description = EXCLUDED.description
            "#,
        )
        .bind(&entry.key)
        .bind(&entry.value)
        .bind(&entry.description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
