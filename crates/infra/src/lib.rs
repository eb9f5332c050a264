mod config;
mod prompts;
mod repos;
mod services;
mod system;
mod timers;

pub use config::{Config, LlmEndpoint, MissedReminderPolicy, WebhookConfig};
pub use prompts::{
    PromptCache, DEFAULT_PARSER_PROMPT, DEFAULT_SOOTHER_PROMPT, PARSER_PROMPT_KEY,
    SOOTHER_PROMPT_KEY,
};
pub use repos::{AppConfigEntry, IAppConfigRepo, IEventRepo, Repos};
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
pub use timers::TimerRegistry;
use tracing::{info, warn};

#[derive(Clone)]
pub struct LullContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub llm: Arc<dyn ILlmClient>,
    pub notifier: Arc<dyn INotifier>,
    pub prompts: Arc<PromptCache>,
    pub timers: Arc<TimerRegistry>,
}

struct ContextParams {
    pub postgres_connection_string: Option<String>,
}

impl LullContext {
    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let config = Config::new();
        let repos = match params.postgres_connection_string {
            Some(connection_string) => Repos::create_postgres(&connection_string).await?,
            None => {
                warn!("DATABASE_URL env var is not set. Reminders will only be kept in memory.");
                Repos::create_inmemory()
            }
        };

        let llm = ChatCompletionsClient::new(
            config.llm_primary.clone(),
            config.llm_backup.clone(),
            config.llm_timeout_millis,
        )?;
        let notifier: Arc<dyn INotifier> = match &config.webhook {
            Some(webhook) => Arc::new(WebhookNotifier::new(
                webhook.clone(),
                config.delivery_timeout_millis,
            )?),
            None => Arc::new(LogNotifier),
        };

        let prompts = Arc::new(PromptCache::new(repos.app_config.clone()));
        prompts.refresh().await?;

        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            llm: Arc::new(llm),
            notifier,
            prompts,
            timers: Arc::new(TimerRegistry::new()),
        })
    }

    /// Context with inmemory repos, a scripted language model and a recording
    /// notifier. Tests swap individual parts as needed.
    pub fn create_inmemory() -> Self {
        let repos = Repos::create_inmemory();
        let prompts = Arc::new(PromptCache::new(repos.app_config.clone()));
        Self {
            repos,
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            llm: Arc::new(ScriptedLlmClient::new()),
            notifier: Arc::new(InMemoryNotifier::new()),
            prompts,
            timers: Arc::new(TimerRegistry::new()),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<LullContext> {
    LullContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> Option<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING).ok()
}

/// Applies the migrations when a database is configured
pub async fn run_migration() -> Result<(), MigrateError> {
    let connection_string = match get_psql_connection_string() {
        Some(connection_string) => connection_string,
        None => return Ok(()),
    };
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&connection_string)
        .await?;

    info!("Running migrations ...");
    sqlx::migrate!().run(&pool).await
}
