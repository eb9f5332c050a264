use super::INotifier;
use anyhow::anyhow;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveredMessage {
    pub owner_ref: String,
    pub subject: String,
    pub body: String,
}

/// Records deliveries instead of sending them
#[derive(Default)]
pub struct InMemoryNotifier {
    delivered: Mutex<Vec<DeliveredMessage>>,
    failing: AtomicBool,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// While failing every delivery returns an error and nothing is recorded
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn delivered(&self) -> Vec<DeliveredMessage> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl INotifier for InMemoryNotifier {
    async fn deliver(&self, owner_ref: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("Delivery to {} failed", owner_ref));
        }
        self.delivered.lock().unwrap().push(DeliveredMessage {
            owner_ref: owner_ref.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
