mod inmemory;
mod postgres;

pub use inmemory::InMemoryEventRepo;
use lull_domain::{EventStatus, Feedback, ReminderEvent, ID};
pub use postgres::PostgresEventRepo;

/// Durable store of reminder events. Status writes are compare-and-set
/// from SILENT and report whether they changed anything.
#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    /// Stores a new event and returns it with its assigned id
    async fn insert(&self, e: &ReminderEvent) -> anyhow::Result<ReminderEvent>;
    /// `Ok(None)` when no event has this id
    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<ReminderEvent>>;
    /// SILENT events whose trigger is still ahead of `now`
    async fn list_pending_future(&self, now: i64) -> anyhow::Result<Vec<ReminderEvent>>;
    /// SILENT events whose trigger is at or before `now`
    async fn list_missed(&self, now: i64) -> anyhow::Result<Vec<ReminderEvent>>;
    /// Newest first
    async fn list_recent_by_owner(
        &self,
        owner_ref: &str,
        limit: i64,
    ) -> anyhow::Result<Vec<ReminderEvent>>;
    /// Newest first
    async fn list_recent_by_owner_and_status(
        &self,
        owner_ref: &str,
        status: EventStatus,
        limit: i64,
    ) -> anyhow::Result<Vec<ReminderEvent>>;
    async fn mark_delivered(&self, event_id: &ID) -> anyhow::Result<bool>;
    async fn mark_canceled(&self, event_id: &ID) -> anyhow::Result<bool>;
    /// Only DELIVERED events accept feedback
    async fn set_feedback(&self, event_id: &ID, feedback: Feedback) -> anyhow::Result<bool>;
    async fn append_reason(&self, event_id: &ID, suffix: &str) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use crate::LullContext;
    use lull_domain::{
        Complexity, Dependency, EventStatus, Feedback, ReminderEvent, TriggerBucket, TriggerIntent,
        ID,
    };

    fn generate_event(owner_ref: &str, trigger_ts: i64, created: i64) -> ReminderEvent {
        ReminderEvent {
            id: ID::unassigned(),
            owner_ref: owner_ref.into(),
            raw_input: "下周三交报告".into(),
            event_ts: trigger_ts + 1000,
            trigger_ts,
            status: EventStatus::Silent,
            bucket: TriggerBucket::D3,
            intent: TriggerIntent::Cushion,
            complexity: Complexity::High,
            prep_required: false,
            dependencies: vec![Dependency::Materials],
            reason: "llm_eventTime_used | finalBucket=D3".into(),
            feedback: None,
            created,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let ctx = LullContext::create_inmemory();
        let first = ctx
            .repos
            .events
            .insert(&generate_event("ann", 100, 1))
            .await
            .unwrap();
        let second = ctx
            .repos
            .events
            .insert(&generate_event("ann", 100, 2))
            .await
            .unwrap();
        assert!(first.id.is_assigned());
        assert!(second.id > first.id);

        let found = ctx.repos.events.find(&first.id).await.unwrap().unwrap();
        assert_eq!(found, first);
        assert!(ctx.repos.events.find(&ID::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn status_writes_only_leave_silent() {
        let ctx = LullContext::create_inmemory();
        let e = ctx
            .repos
            .events
            .insert(&generate_event("ann", 100, 1))
            .await
            .unwrap();

        assert!(!ctx.repos.events.set_feedback(&e.id, Feedback::Early).await.unwrap());
        assert!(ctx.repos.events.mark_delivered(&e.id).await.unwrap());
        assert!(!ctx.repos.events.mark_delivered(&e.id).await.unwrap());
        assert!(!ctx.repos.events.mark_canceled(&e.id).await.unwrap());
        assert!(ctx.repos.events.set_feedback(&e.id, Feedback::Late).await.unwrap());

        let found = ctx.repos.events.find(&e.id).await.unwrap().unwrap();
        assert_eq!(found.status, EventStatus::Delivered);
        assert_eq!(found.feedback, Some(Feedback::Late));

        assert!(!ctx.repos.events.mark_delivered(&ID::new(42)).await.unwrap());
    }

    #[tokio::test]
    async fn cancel_is_absorbing() {
        let ctx = LullContext::create_inmemory();
        let e = ctx
            .repos
            .events
            .insert(&generate_event("ann", 100, 1))
            .await
            .unwrap();
        assert!(ctx.repos.events.mark_canceled(&e.id).await.unwrap());
        assert!(!ctx.repos.events.mark_canceled(&e.id).await.unwrap());
        assert!(!ctx.repos.events.mark_delivered(&e.id).await.unwrap());
        let found = ctx.repos.events.find(&e.id).await.unwrap().unwrap();
        assert_eq!(found.status, EventStatus::Canceled);
    }

    #[tokio::test]
    async fn lists_pending_and_missed_by_trigger() {
        let ctx = LullContext::create_inmemory();
        let past = ctx.repos.events.insert(&generate_event("ann", 50, 1)).await.unwrap();
        let future = ctx.repos.events.insert(&generate_event("ann", 150, 2)).await.unwrap();
        let canceled = ctx.repos.events.insert(&generate_event("ann", 200, 3)).await.unwrap();
        ctx.repos.events.mark_canceled(&canceled.id).await.unwrap();

        let pending = ctx.repos.events.list_pending_future(100).await.unwrap();
        assert_eq!(pending.iter().map(|e| e.id).collect::<Vec<_>>(), vec![future.id]);
        let missed = ctx.repos.events.list_missed(100).await.unwrap();
        assert_eq!(missed.iter().map(|e| e.id).collect::<Vec<_>>(), vec![past.id]);
    }

    #[tokio::test]
    async fn lists_recent_by_owner_newest_first() {
        let ctx = LullContext::create_inmemory();
        for created in 1..=5 {
            ctx.repos
                .events
                .insert(&generate_event("ann", 100, created))
                .await
                .unwrap();
        }
        let bob = ctx.repos.events.insert(&generate_event("bob", 100, 9)).await.unwrap();
        ctx.repos.events.mark_delivered(&bob.id).await.unwrap();

        let recent = ctx.repos.events.list_recent_by_owner("ann", 3).await.unwrap();
        assert_eq!(
            recent.iter().map(|e| e.created).collect::<Vec<_>>(),
            vec![5, 4, 3]
        );

        let delivered = ctx
            .repos
            .events
            .list_recent_by_owner_and_status("bob", EventStatus::Delivered, 10)
            .await
            .unwrap();
        assert_eq!(delivered.len(), 1);
        let delivered = ctx
            .repos
            .events
            .list_recent_by_owner_and_status("ann", EventStatus::Delivered, 10)
            .await
            .unwrap();
        assert!(delivered.is_empty());
    }

    #[tokio::test]
    async fn appends_to_reason() {
        let ctx = LullContext::create_inmemory();
        let e = ctx.repos.events.insert(&generate_event("ann", 100, 1)).await.unwrap();
        ctx.repos.events.append_reason(&e.id, "|late_recovery").await.unwrap();
        let found = ctx.repos.events.find(&e.id).await.unwrap().unwrap();
        assert!(found.reason.ends_with("finalBucket=D3|late_recovery"));
    }
}
