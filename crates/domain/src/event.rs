use crate::{
    bucket::TriggerBucket,
    parse::{Complexity, Dependency, TriggerIntent, UnknownTagError},
    shared::entity::{Entity, ID},
    trigger_plan::TriggerPlan,
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Silent,
    Delivered,
    Canceled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silent => "SILENT",
            Self::Delivered => "DELIVERED",
            Self::Canceled => "CANCELED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Silent)
    }
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SILENT" => Ok(Self::Silent),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELED" => Ok(Self::Canceled),
            _ => Err(UnknownTagError(s.to_string())),
        }
    }
}

/// How the user felt about the moment a reminder arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feedback {
    Early,
    OnTime,
    Late,
}

impl Feedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Early => "EARLY",
            Self::OnTime => "ON_TIME",
            Self::Late => "LATE",
        }
    }
}

impl Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feedback {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EARLY" => Ok(Self::Early),
            "ON_TIME" => Ok(Self::OnTime),
            "LATE" => Ok(Self::Late),
            _ => Err(UnknownTagError(s.to_string())),
        }
    }
}

/// One accepted utterance and the reminder planned for it.
/// All timestamps are UTC millis.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderEvent {
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

impl Entity for ReminderEvent {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl ReminderEvent {
    /// A new SILENT event for the given plan. The id is assigned by the store.
    pub fn planned(
        owner_ref: &str,
        raw_input: &str,
        plan: &TriggerPlan,
        prep_required: bool,
        dependencies: Vec<Dependency>,
        time_reason: &str,
        created: i64,
    ) -> Self {
        Self {
            id: ID::unassigned(),
            owner_ref: owner_ref.to_string(),
            raw_input: raw_input.to_string(),
            event_ts: plan.event_ts,
            trigger_ts: plan.trigger_ts,
            status: EventStatus::Silent,
            bucket: plan.bucket,
            intent: plan.intent,
            complexity: plan.complexity,
            prep_required,
            dependencies,
            reason: format!("{} | {}", time_reason, plan.reason),
            feedback: None,
            created,
        }
    }

    pub fn is_silent(&self) -> bool {
        self.status == EventStatus::Silent
    }

    pub fn is_owned_by(&self, owner_ref: &str) -> bool {
        self.owner_ref == owner_ref
    }

    pub fn trigger_passed(&self, now: i64) -> bool {
        self.trigger_ts <= now
    }

    /// Stored form of the dependency set, e.g. `["people","tickets"]`
    pub fn dependencies_json(&self) -> String {
        serde_json::to_string(
            &self
                .dependencies
                .iter()
                .map(|d| d.as_str())
                .collect::<Vec<_>>(),
        )
        .unwrap_or_else(|_| "[]".into())
    }

    pub fn parse_dependencies_json(raw: &str) -> Vec<Dependency> {
        let tags: Vec<String> = serde_json::from_str(raw).unwrap_or_default();
        let mut deps = tags
            .iter()
            .filter_map(|t| t.parse::<Dependency>().ok())
            .collect::<Vec<_>>();
        deps.sort();
        deps.dedup();
        deps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> ReminderEvent {
        ReminderEvent {
            id: ID::new(1),
            owner_ref: "ann@example.com".into(),
            raw_input: "下周三交报告".into(),
            event_ts: 1000,
            trigger_ts: 500,
            status: EventStatus::Silent,
            bucket: TriggerBucket::D3,
            intent: TriggerIntent::Cushion,
            complexity: Complexity::High,
            prep_required: false,
            dependencies: vec![Dependency::People, Dependency::Tickets],
            reason: String::new(),
            feedback: None,
            created: 0,
        }
    }

    #[test]
    fn status_tags() {
        assert_eq!("delivered".parse::<EventStatus>(), Ok(EventStatus::Delivered));
        assert!(EventStatus::Canceled.is_terminal());
        assert!(!EventStatus::Silent.is_terminal());
        assert_eq!(Feedback::OnTime.to_string(), "ON_TIME");
        assert!("MEH".parse::<Feedback>().is_err());
    }

    #[test]
    fn dependencies_are_stored_as_json_tags() {
        let e = event();
        assert_eq!(e.dependencies_json(), r#"["people","tickets"]"#);
        assert_eq!(
            ReminderEvent::parse_dependencies_json(r#"["tickets","people","rockets"]"#),
            vec![Dependency::People, Dependency::Tickets]
        );
        assert!(ReminderEvent::parse_dependencies_json("not json").is_empty());
    }

    #[test]
    fn ownership_and_timing_checks() {
        let e = event();
        assert!(e.is_owned_by("ann@example.com"));
        assert!(!e.is_owned_by("bob@example.com"));
        assert!(e.trigger_passed(500));
        assert!(!e.trigger_passed(499));
    }
}
