use super::IEventRepo;
use crate::repos::shared::inmemory_repo::*;
use lull_domain::{EventStatus, Feedback, ReminderEvent, ID};
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Mutex,
};

pub struct InMemoryEventRepo {
    events: Mutex<Vec<ReminderEvent>>,
    next_id: AtomicI64,
}

impl InMemoryEventRepo {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn newest_first<F: FnMut(&ReminderEvent) -> bool>(
        &self,
        compare: F,
        limit: i64,
    ) -> Vec<ReminderEvent> {
        let mut events = find_by(&self.events, compare);
        events.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        events.truncate(limit.max(0) as usize);
        events
    }

    fn transition(&self, event_id: &ID, status: EventStatus) -> bool {
        update_one(event_id, &self.events, |e| {
            if e.is_silent() {
                e.status = status;
                true
            } else {
                false
            }
        })
        .unwrap_or(false)
    }
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, e: &ReminderEvent) -> anyhow::Result<ReminderEvent> {
        let mut stored = e.clone();
        stored.id = ID::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        insert(&stored, &self.events);
        Ok(stored)
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<ReminderEvent>> {
        Ok(find(event_id, &self.events))
    }

    async fn list_pending_future(&self, now: i64) -> anyhow::Result<Vec<ReminderEvent>> {
        let mut events = find_by(&self.events, |e| e.is_silent() && e.trigger_ts > now);
        events.sort_by_key(|e| e.trigger_ts);
        Ok(events)
    }

    async fn list_missed(&self, now: i64) -> anyhow::Result<Vec<ReminderEvent>> {
        let mut events = find_by(&self.events, |e| e.is_silent() && e.trigger_ts <= now);
        events.sort_by_key(|e| e.trigger_ts);
        Ok(events)
    }

    async fn list_recent_by_owner(
        &self,
        owner_ref: &str,
        limit: i64,
    ) -> anyhow::Result<Vec<ReminderEvent>> {
        Ok(self.newest_first(|e| e.owner_ref == owner_ref, limit))
    }

    async fn list_recent_by_owner_and_status(
        &self,
        owner_ref: &str,
        status: EventStatus,
        limit: i64,
    ) -> anyhow::Result<Vec<ReminderEvent>> {
        Ok(self.newest_first(|e| e.owner_ref == owner_ref && e.status == status, limit))
    }

    async fn mark_delivered(&self, event_id: &ID) -> anyhow::Result<bool> {
        Ok(self.transition(event_id, EventStatus::Delivered))
    }

    async fn mark_canceled(&self, event_id: &ID) -> anyhow::Result<bool> {
        Ok(self.transition(event_id, EventStatus::Canceled))
    }

    async fn set_feedback(&self, event_id: &ID, feedback: Feedback) -> anyhow::Result<bool> {
        Ok(update_one(event_id, &self.events, |e| {
            if e.status == EventStatus::Delivered {
                e.feedback = Some(feedback);
                true
            } else {
                false
            }
        })
        .unwrap_or(false))
    }

    async fn append_reason(&self, event_id: &ID, suffix: &str) -> anyhow::Result<()> {
        update_one(event_id, &self.events, |e| e.reason.push_str(suffix));
        Ok(())
    }
}
