use lull_domain::{EventStatus, Feedback, ReminderEvent, ID};
use lull_infra::IEventRepo;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fault {
    /// Every `find` fails as if the database was unreachable
    FailingReads,
    /// The event is canceled right before `mark_delivered` runs
    CancelBeforeDelivered,
}

/// Event repo that injects a single fault on top of another repo.
pub struct FaultyEventRepo {
    inner: Arc<dyn IEventRepo>,
    fault: Fault,
}

impl FaultyEventRepo {
    pub fn new(inner: Arc<dyn IEventRepo>, fault: Fault) -> Self {
        Self { inner, fault }
    }
}

#[async_trait::async_trait]
impl IEventRepo for FaultyEventRepo {
    async fn insert(&self, e: &ReminderEvent) -> anyhow::Result<ReminderEvent> {
        self.inner.insert(e).await
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<ReminderEvent>> {
        if self.fault == Fault::FailingReads {
            return Err(anyhow::anyhow!("connection reset while loading {}", event_id));
        }
        self.inner.find(event_id).await
    }

    async fn list_pending_future(&self, now: i64) -> anyhow::Result<Vec<ReminderEvent>> {
        self.inner.list_pending_future(now).await
    }

    async fn list_missed(&self, now: i64) -> anyhow::Result<Vec<ReminderEvent>> {
        self.inner.list_missed(now).await
    }

    async fn list_recent_by_owner(
        &self,
        owner_ref: &str,
        limit: i64,
    ) -> anyhow::Result<Vec<ReminderEvent>> {
        self.inner.list_recent_by_owner(owner_ref, limit).await
    }

    async fn list_recent_by_owner_and_status(
        &self,
        owner_ref: &str,
        status: EventStatus,
        limit: i64,
    ) -> anyhow::Result<Vec<ReminderEvent>> {
        self.inner
            .list_recent_by_owner_and_status(owner_ref, status, limit)
            .await
    }

    async fn mark_delivered(&self, event_id: &ID) -> anyhow::Result<bool> {
        if self.fault == Fault::CancelBeforeDelivered {
            self.inner.mark_canceled(event_id).await?;
        }
        self.inner.mark_delivered(event_id).await
    }

    async fn mark_canceled(&self, event_id: &ID) -> anyhow::Result<bool> {
        self.inner.mark_canceled(event_id).await
    }

    async fn set_feedback(&self, event_id: &ID, feedback: Feedback) -> anyhow::Result<bool> {
        self.inner.set_feedback(event_id, feedback).await
    }

    async fn append_reason(&self, event_id: &ID, suffix: &str) -> anyhow::Result<()> {
        self.inner.append_reason(event_id, suffix).await
    }
}
