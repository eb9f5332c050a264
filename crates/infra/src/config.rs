use chrono_tz::Tz;
use lull_domain::BiasSettings;
use lull_utils::create_random_secret;
use std::{fmt::Display, str::FromStr};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct LlmEndpoint {
    /// Full url of an OpenAI compatible chat completions endpoint
    pub url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    /// Sent in the `lull-webhook-key` header so the receiver can verify the caller
    pub key: String,
}

/// What to do with SILENT events whose trigger passed while the process was down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissedReminderPolicy {
    /// Leave them SILENT for an operator to look at
    Leave,
    /// Fire them right away and mark them with `late_recovery`
    Fire,
}

impl FromStr for MissedReminderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "leave" => Ok(Self::Leave),
            "fire" => Ok(Self::Fire),
            other => Err(format!("unknown missed reminder policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Secret key required for the admin endpoints
    pub admin_secret_key: String,
    /// Wall clock zone every local date time is anchored in
    pub timezone: Tz,
    pub llm_primary: Option<LlmEndpoint>,
    pub llm_backup: Option<LlmEndpoint>,
    /// Hard timeout for a single language model call
    pub llm_timeout_millis: u64,
    /// Where reminders are delivered. Reminders are only logged when missing.
    pub webhook: Option<WebhookConfig>,
    pub delivery_timeout_millis: u64,
    pub intake_queue_capacity: usize,
    pub intake_workers: usize,
    pub bias: BiasSettings,
    pub missed_reminders: MissedReminderPolicy,
}

impl Config {
    pub fn new() -> Self {
        let admin_secret_key = match std::env::var("LULL_ADMIN_SECRET_KEY") {
            Ok(key) => key,
            Err(_) => {
                info!("Did not find LULL_ADMIN_SECRET_KEY environment variable. Going to create one.");
                let key = create_random_secret(16);
                info!("Secret key for the admin endpoints was generated and set to: {}", key);
                key
            }
        };

        let default_timezone = chrono_tz::Asia::Shanghai;
        let timezone = match std::env::var("LULL_TIMEZONE") {
            Ok(tz) => match tz.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given LULL_TIMEZONE: {} is not valid, falling back to: {}.",
                        tz, default_timezone
                    );
                    default_timezone
                }
            },
            Err(_) => default_timezone,
        };

        let defaults = BiasSettings::default();
        let bias = BiasSettings {
            window: env_or("LULL_BIAS_WINDOW", defaults.window),
            dampening: env_or("LULL_BIAS_DAMPENING", defaults.dampening).max(1),
            max_steps: env_or("LULL_BIAS_MAX_STEPS", defaults.max_steps).abs(),
        };

        let llm_primary = llm_endpoint("PRIMARY");
        if llm_primary.is_none() {
            warn!("No primary language model configured. Every utterance will be rejected.");
        }

        let webhook = match std::env::var("LULL_WEBHOOK_URL") {
            Ok(url) => Some(WebhookConfig {
                url,
                key: std::env::var("LULL_WEBHOOK_KEY").unwrap_or_default(),
            }),
            Err(_) => {
                info!("Did not find LULL_WEBHOOK_URL environment variable. Reminders will only be logged.");
                None
            }
        };

        Self {
            port: env_or("PORT", 5000),
            admin_secret_key,
            timezone,
            llm_primary,
            llm_backup: llm_endpoint("BACKUP"),
            llm_timeout_millis: env_or("LULL_LLM_TIMEOUT_MILLIS", 8_000),
            webhook,
            delivery_timeout_millis: env_or("LULL_DELIVERY_TIMEOUT_MILLIS", 10_000),
            intake_queue_capacity: env_or("LULL_INTAKE_QUEUE_CAPACITY", 256usize).max(1),
            intake_workers: env_or("LULL_INTAKE_WORKERS", 4usize).max(1),
            bias,
            missed_reminders: env_or("LULL_MISSED_REMINDERS", MissedReminderPolicy::Leave),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn llm_endpoint(slot: &str) -> Option<LlmEndpoint> {
    let url = std::env::var(format!("LULL_LLM_{}_URL", slot)).ok()?;
    Some(LlmEndpoint {
        url,
        api_key: std::env::var(format!("LULL_LLM_{}_API_KEY", slot)).unwrap_or_default(),
        model: std::env::var(format!("LULL_LLM_{}_MODEL", slot))
            .unwrap_or_else(|_| "deepseek-chat".into()),
    })
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match std::env::var(key) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    key, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Display for MissedReminderPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leave => f.write_str("leave"),
            Self::Fire => f.write_str("fire"),
        }
    }
}
