use chrono::{prelude::*, Duration};

const SOON_TOKENS: [&str; 6] = ["等一下", "等会", "等一会", "稍后", "一会", "一会儿"];
const MINUTE_TOKENS: [&str; 3] = ["分钟", "分", "min"];

const EVENING_TOKENS: [&str; 3] = ["晚上", "夜里", "夜晚"];
const AFTERNOON_TOKENS: [&str; 1] = ["下午"];
const NOON_TOKENS: [&str; 3] = ["中午", "午饭", "午餐"];
const MORNING_TOKENS: [&str; 3] = ["早上", "上午", "清晨"];

/// The event time the planner works with, anchored in the configured zone.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEventTime {
    pub local: NaiveDateTime,
    /// `false` only when the model gave a usable explicit time
    pub assumed: bool,
    pub reason: String,
}

impl NormalizedEventTime {
    fn new(local: NaiveDateTime, assumed: bool, reason: impl Into<String>) -> Self {
        Self {
            local,
            assumed,
            reason: reason.into(),
        }
    }
}

enum DateAnchor {
    Tomorrow,
    AfterTomorrow,
    NextWeekMonday,
    NextMonthFirst,
    Today,
    ImplicitToday,
}

impl DateAnchor {
    fn detect(raw: &str) -> Self {
        if contains_any(raw, &["明天", "明日"]) {
            Self::Tomorrow
        } else if raw.contains("后天") {
            Self::AfterTomorrow
        } else if raw.contains("下周") {
            Self::NextWeekMonday
        } else if raw.contains("下个月") {
            Self::NextMonthFirst
        } else if contains_any(raw, &["今天", "今日"]) {
            Self::Today
        } else {
            Self::ImplicitToday
        }
    }

    fn is_explicit(&self) -> bool {
        !matches!(self, Self::ImplicitToday)
    }

    fn resolve(&self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Tomorrow => today + Duration::days(1),
            Self::AfterTomorrow => today + Duration::days(2),
            Self::NextWeekMonday => {
                let days_from_monday = today.weekday().num_days_from_monday() as i64;
                today + Duration::days(7 - days_from_monday)
            }
            Self::NextMonthFirst => first_of_next_month(today),
            Self::Today | Self::ImplicitToday => today,
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            Self::Tomorrow => "tomorrow",
            Self::AfterTomorrow => "after_tomorrow",
            Self::NextWeekMonday => "next_week_monday",
            Self::NextMonthFirst => "next_month_1st",
            Self::Today => "today",
            Self::ImplicitToday => "implicit_today",
        }
    }
}

enum TimeAnchor {
    Evening,
    Afternoon,
    Noon,
    Morning,
    DefaultMorning,
}

impl TimeAnchor {
    fn detect(raw: &str) -> Self {
        if contains_any(raw, &EVENING_TOKENS) {
            Self::Evening
        } else if contains_any(raw, &AFTERNOON_TOKENS) {
            Self::Afternoon
        } else if contains_any(raw, &NOON_TOKENS) {
            Self::Noon
        } else if contains_any(raw, &MORNING_TOKENS) {
            Self::Morning
        } else {
            Self::DefaultMorning
        }
    }

    fn is_period(&self) -> bool {
        !matches!(self, Self::DefaultMorning)
    }

    fn hour(&self) -> u32 {
        match self {
            Self::Evening => 20,
            Self::Afternoon => 15,
            Self::Noon => 12,
            Self::Morning | Self::DefaultMorning => 9,
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            Self::Evening => "evening_20:00",
            Self::Afternoon => "afternoon_15:00",
            Self::Noon => "noon_12:00",
            Self::Morning => "morning_09:00",
            Self::DefaultMorning => "default_09:00",
        }
    }
}

/// Turns the model's event time, or failing that the fuzzy wording of the
/// raw input, into a concrete local time. The first matching rule wins and
/// the reason tag names it.
pub fn normalize_event_time(
    event_time_text: Option<&str>,
    raw_input: &str,
    now: NaiveDateTime,
) -> NormalizedEventTime {
    let soon = now + Duration::minutes(10);

    if let Some(text) = event_time_text.map(str::trim).filter(|t| !t.is_empty()) {
        return match parse_event_time(text) {
            Some(local) => NormalizedEventTime::new(local, false, "llm_eventTime_used"),
            None => NormalizedEventTime::new(
                soon,
                true,
                "fuzzy_assumed:llm_eventTime_parse_failed|soon_now+10m",
            ),
        };
    }

    let raw = raw_input.trim();
    if raw.is_empty() {
        return NormalizedEventTime::new(soon, true, "fuzzy_assumed:missing_raw|soon_now+10m");
    }

    if contains_any(raw, &SOON_TOKENS) && !contains_any(raw, &MINUTE_TOKENS) {
        return NormalizedEventTime::new(soon, true, "fuzzy_assumed:soon_now+10m");
    }

    let date_anchor = DateAnchor::detect(raw);
    let time_anchor = TimeAnchor::detect(raw);

    let date = date_anchor.resolve(now.date());
    let mut anchored = date.and_time(NaiveTime::from_hms_opt(time_anchor.hour(), 0, 0).unwrap_or_default());
    let mut reason = format!(
        "fuzzy_assumed:{}+{}",
        date_anchor.reason(),
        time_anchor.reason()
    );

    if time_anchor.is_period() && !date_anchor.is_explicit() && anchored <= now {
        anchored += Duration::days(1);
        reason.push_str("|rolled_to_tomorrow");
    }

    NormalizedEventTime::new(anchored, true, reason)
}

/// Accepts `yyyy-MM-ddTHH:mm:ss`, `yyyy-MM-dd HH:mm:ss` and `yyyy-MM-dd HH:mm`
pub fn parse_event_time(text: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text.trim(), fmt).ok())
}

fn first_of_next_month(today: NaiveDate) -> NaiveDate {
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(today)
}

fn contains_any(text: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|t| !t.is_empty() && text.contains(t))
}
