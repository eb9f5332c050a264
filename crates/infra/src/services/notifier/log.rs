use super::INotifier;
use tracing::info;

/// Writes reminders to the log. Used when no webhook is configured.
pub struct LogNotifier;

#[async_trait::async_trait]
impl INotifier for LogNotifier {
    async fn deliver(&self, owner_ref: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        info!(owner_ref, subject, body, "Reminder delivered to log");
        Ok(())
    }
}
