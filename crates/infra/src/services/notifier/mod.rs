mod inmemory;
mod log;
mod webhook;

pub use self::log::LogNotifier;
pub use inmemory::{DeliveredMessage, InMemoryNotifier};
pub use webhook::WebhookNotifier;

/// Delivers a reminder to its owner. An `Err` means nothing reached the owner.
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    async fn deliver(&self, owner_ref: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}
