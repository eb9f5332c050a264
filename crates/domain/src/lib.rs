mod bias;
mod bucket;
pub mod date;
mod event;
mod parse;
mod shared;
mod time_normalizer;
mod trigger_plan;

pub use bias::{compute_bias_steps, BiasSettings};
pub use bucket::{InvalidBucketError, TriggerBucket};
pub use event::{EventStatus, Feedback, ReminderEvent};
pub use parse::{
    mentions_urgent_minutes, strip_code_fences, Complexity, Dependency, ParseRecord,
    ParseRecordError, TriggerIntent, UnknownTagError,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use time_normalizer::{normalize_event_time, parse_event_time, NormalizedEventTime};
pub use trigger_plan::{TriggerPlan, TriggerPolicy};
