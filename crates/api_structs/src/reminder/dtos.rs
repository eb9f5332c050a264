use lull_domain::{
    Complexity, Dependency, EventStatus, Feedback, ReminderEvent, TriggerBucket, TriggerIntent,
    ID,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub owner_ref: String,
    pub raw_input: String,
    pub event_ts: i64,
    pub trigger_ts: i64,
    pub status: EventStatus,
    pub bucket: TriggerBucket,
    pub intent: TriggerIntent,
    pub complexity: Complexity,
    pub prep_required: bool,
    pub dependencies: Vec<Dependency>,
    pub reason: String,
    pub feedback: Option<Feedback>,
    pub created: i64,
}

impl ReminderDTO {
    pub fn new(event: ReminderEvent) -> Self {
        Self {
            id: event.id,
            owner_ref: event.owner_ref,
            raw_input: event.raw_input,
            event_ts: event.event_ts,
            trigger_ts: event.trigger_ts,
            status: event.status,
            bucket: event.bucket,
            intent: event.intent,
            complexity: event.complexity,
            prep_required: event.prep_required,
            dependencies: event.dependencies,
            reason: event.reason,
            feedback: event.feedback,
            created: event.created,
        }
    }
}
