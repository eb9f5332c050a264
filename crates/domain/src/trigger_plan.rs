use crate::{
    bucket::TriggerBucket,
    parse::{Complexity, ParseRecord, TriggerIntent},
};
use chrono::Duration;

const FALLBACK_DELAY_MILLIS: i64 = 5_000;

/// When and why a reminder fires. Timestamps are UTC millis.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerPlan {
    pub event_ts: i64,
    pub trigger_ts: i64,
    pub bucket: TriggerBucket,
    pub intent: TriggerIntent,
    pub complexity: Complexity,
    /// The user used imminent, minute level language
    pub forced_immediate: bool,
    /// The trigger was rewritten because the computed one was unusable
    pub fallback: bool,
    pub reason: String,
}

pub struct TriggerPolicy;

impl TriggerPolicy {
    /// Picks a lead time bucket for the event and derives the trigger time.
    /// `bias_steps` is the owner's learned offset, positive meaning later.
    pub fn plan(parse: &ParseRecord, event_ts: i64, now: i64, bias_steps: i64) -> TriggerPlan {
        let intent = parse.intent_or_default();
        let complexity = parse.complexity_or_default();
        let horizon = Duration::milliseconds(event_ts - now);

        let (bucket, reason) = if parse.urgent_minute_level {
            let bucket = at_time_bucket(horizon).shift(bias_steps);
            let reason = format!(
                "forced urgentMinuteLevel, horizonMin={}, biasSteps={}, finalBucket={}",
                horizon.num_minutes(),
                bias_steps,
                bucket
            );
            (bucket, reason)
        } else {
            let bucket = Self::policy_bucket(parse, intent, complexity, horizon).shift(bias_steps);
            let reason = format!(
                "intent={}, complexity={}, prepRequired={}, deps={}, biasSteps={}, finalBucket={}",
                intent,
                complexity,
                parse.prep_required,
                parse.dependencies.len(),
                bias_steps,
                bucket
            );
            (bucket, reason)
        };

        let mut plan = TriggerPlan {
            event_ts,
            trigger_ts: event_ts - bucket.lead_time_millis(),
            bucket,
            intent,
            complexity,
            forced_immediate: parse.urgent_minute_level,
            fallback: false,
            reason,
        };
        apply_safety_clamp(&mut plan, now);
        plan
    }

    fn policy_bucket(
        parse: &ParseRecord,
        intent: TriggerIntent,
        complexity: Complexity,
        horizon: Duration,
    ) -> TriggerBucket {
        let mut bucket = match intent {
            TriggerIntent::AtTime => at_time_bucket(horizon),
            _ => horizon_bucket(horizon),
        };

        if intent != TriggerIntent::AtTime {
            if intent == TriggerIntent::Prepare {
                bucket = bucket.earlier();
            }
            bucket = match complexity {
                Complexity::High => bucket.earlier(),
                Complexity::Low => bucket.later(),
                Complexity::Medium => bucket,
            };
        }
        if parse.prep_required {
            bucket = bucket.earlier();
        }
        if parse.has_dependencies() {
            bucket = bucket.earlier();
        }
        bucket
    }
}

// Thresholds are inclusive and compared against the exact horizon.

fn at_time_bucket(horizon: Duration) -> TriggerBucket {
    if horizon <= Duration::minutes(2) {
        TriggerBucket::M0
    } else if horizon <= Duration::minutes(10) {
        TriggerBucket::M1
    } else if horizon <= Duration::minutes(30) {
        TriggerBucket::M5
    } else if horizon <= Duration::hours(2) {
        TriggerBucket::M15
    } else if horizon <= Duration::hours(8) {
        TriggerBucket::M30
    } else {
        TriggerBucket::H1
    }
}

fn horizon_bucket(horizon: Duration) -> TriggerBucket {
    if horizon <= Duration::minutes(30) {
        TriggerBucket::M5
    } else if horizon <= Duration::hours(2) {
        TriggerBucket::M15
    } else if horizon <= Duration::hours(8) {
        TriggerBucket::H1
    } else if horizon <= Duration::days(1) {
        TriggerBucket::H4
    } else if horizon <= Duration::days(3) {
        TriggerBucket::D1
    } else if horizon <= Duration::days(14) {
        TriggerBucket::D3
    } else if horizon <= Duration::days(45) {
        TriggerBucket::D7
    } else {
        TriggerBucket::D14
    }
}

fn apply_safety_clamp(plan: &mut TriggerPlan, now: i64) {
    if plan.event_ts <= now {
        plan.trigger_ts = now + FALLBACK_DELAY_MILLIS;
        plan.fallback = true;
        plan.reason.push_str(", eventTime_in_past => schedule_now+5s");
        return;
    }

    if plan.trigger_ts >= plan.event_ts {
        plan.trigger_ts = plan.event_ts - 1;
        plan.reason.push_str(", trigger_clamped_before_event");
    }

    if plan.trigger_ts <= now {
        plan.trigger_ts = (now + FALLBACK_DELAY_MILLIS)
            .min(plan.event_ts - 1_000)
            .max(now);
        plan.fallback = true;
        plan.reason.push_str(", trigger_in_past => fallback_now+5s");
    }
}
