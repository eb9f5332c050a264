use crate::event::{EventStatus, Feedback, ReminderEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiasSettings {
    /// How many recent delivered events are looked at
    pub window: usize,
    /// `score` is divided by this before rounding
    pub dampening: i64,
    pub max_steps: i64,
}

impl Default for BiasSettings {
    fn default() -> Self {
        Self {
            window: 12,
            dampening: 2,
            max_steps: 2,
        }
    }
}

/// Learned lead time offset for one owner. `recent` is expected to hold the
/// owner's most recent DELIVERED events, newest first. Positive steps move
/// future triggers later, negative steps move them earlier.
pub fn compute_bias_steps(recent: &[ReminderEvent], settings: &BiasSettings) -> i64 {
    let (early, late) = recent
        .iter()
        .filter(|e| e.status == EventStatus::Delivered)
        .take(settings.window)
        .filter(|e| !e.bucket.is_minute_level())
        .fold((0i64, 0i64), |(early, late), e| match e.feedback {
            Some(Feedback::Early) => (early + 1, late),
            Some(Feedback::Late) => (early, late + 1),
            _ => (early, late),
        });

    let score = early - late;
    let dampening = settings.dampening.max(1) as f64;
    // Half-up rounding, so -0.5 rounds to 0 and 1.5 rounds to 2
    let steps = (score as f64 / dampening + 0.5).floor() as i64;
    let max = settings.max_steps.abs();
    steps.max(-max).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bucket::TriggerBucket,
        parse::{Complexity, TriggerIntent},
        shared::entity::ID,
    };

    fn delivered(bucket: TriggerBucket, feedback: Option<Feedback>) -> ReminderEvent {
        ReminderEvent {
            id: ID::new(1),
            owner_ref: "ann".into(),
            raw_input: "x".into(),
            event_ts: 0,
            trigger_ts: 0,
            status: EventStatus::Delivered,
            bucket,
            intent: TriggerIntent::Cushion,
            complexity: Complexity::Medium,
            prep_required: false,
            dependencies: Vec::new(),
            reason: String::new(),
            feedback,
            created: 0,
        }
    }

    fn many(n: usize, bucket: TriggerBucket, feedback: Feedback) -> Vec<ReminderEvent> {
        (0..n).map(|_| delivered(bucket, Some(feedback))).collect()
    }

    #[test]
    fn no_history_means_no_bias() {
        assert_eq!(compute_bias_steps(&[], &BiasSettings::default()), 0);
    }

    #[test]
    fn minute_buckets_do_not_count() {
        let events = many(8, TriggerBucket::M15, Feedback::Early);
        assert_eq!(compute_bias_steps(&events, &BiasSettings::default()), 0);
    }

    #[test]
    fn dampens_and_rounds_half_up() {
        let settings = BiasSettings::default();
        assert_eq!(compute_bias_steps(&many(1, TriggerBucket::H4, Feedback::Early), &settings), 1);
        assert_eq!(compute_bias_steps(&many(2, TriggerBucket::H4, Feedback::Early), &settings), 1);
        assert_eq!(compute_bias_steps(&many(3, TriggerBucket::H4, Feedback::Early), &settings), 2);
        assert_eq!(compute_bias_steps(&many(1, TriggerBucket::H4, Feedback::Late), &settings), 0);
        assert_eq!(compute_bias_steps(&many(3, TriggerBucket::D1, Feedback::Late), &settings), -1);
    }

    #[test]
    fn output_is_clamped() {
        let settings = BiasSettings::default();
        assert_eq!(compute_bias_steps(&many(12, TriggerBucket::D1, Feedback::Early), &settings), 2);
        assert_eq!(compute_bias_steps(&many(12, TriggerBucket::D1, Feedback::Late), &settings), -2);
    }

    #[test]
    fn only_the_window_is_considered() {
        let mut events = many(12, TriggerBucket::D1, Feedback::OnTime);
        events.extend(many(6, TriggerBucket::D1, Feedback::Late));
        assert_eq!(compute_bias_steps(&events, &BiasSettings::default()), 0);
    }

    #[test]
    fn feedback_cancels_out() {
        let mut events = many(4, TriggerBucket::H8, Feedback::Early);
        events.extend(many(4, TriggerBucket::D3, Feedback::Late));
        events.push(delivered(TriggerBucket::D3, None));
        assert_eq!(compute_bias_steps(&events, &BiasSettings::default()), 0);
    }
}
