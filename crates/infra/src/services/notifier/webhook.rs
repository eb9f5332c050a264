use super::INotifier;
use crate::config::WebhookConfig;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::error;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReminderWebhookBody<'a> {
    owner_ref: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// POSTs every reminder as JSON to the configured url. The receiver is
/// responsible for the actual transport (mail, sms, push).
pub struct WebhookNotifier {
    client: Client,
    config: WebhookConfig,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig, timeout_millis: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_millis))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait::async_trait]
impl INotifier for WebhookNotifier {
    async fn deliver(&self, owner_ref: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let payload = ReminderWebhookBody {
            owner_ref,
            subject,
            body,
        };
        match self
            .client
            .post(&self.config.url)
            .header("lull-webhook-key", &self.config.key)
            .json(&payload)
            .send()
            .await
            .and_then(|res| res.error_for_status())
        {
            Ok(_) => Ok(()),
            Err(e) => {
                error!(
                    "[Network Error] Reminder webhook POST error. Error message: {:?}",
                    e
                );
                Err(anyhow::Error::new(e))
            }
        }
    }
}
