use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerIntent {
    /// Fire close to the literal time ("in 5 minutes")
    AtTime,
    /// Emotional safety net ("hand in the report")
    Cushion,
    /// Needs preparation ("trip", "checkup", "interview")
    Prepare,
}

impl TriggerIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AtTime => "AT_TIME",
            Self::Cushion => "CUSHION",
            Self::Prepare => "PREPARE",
        }
    }
}

impl Default for TriggerIntent {
    fn default() -> Self {
        Self::Cushion
    }
}

impl Display for TriggerIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerIntent {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AT_TIME" => Ok(Self::AtTime),
            "CUSHION" => Ok(Self::Cushion),
            "PREPARE" => Ok(Self::Prepare),
            _ => Err(UnknownTagError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl Default for Complexity {
    fn default() -> Self {
        Self::Medium
    }
}

impl Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Complexity {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            _ => Err(UnknownTagError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dependency {
    People,
    Tickets,
    Materials,
}

impl Dependency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::People => "people",
            Self::Tickets => "tickets",
            Self::Materials => "materials",
        }
    }
}

impl FromStr for Dependency {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "people" => Ok(Self::People),
            "tickets" => Ok(Self::Tickets),
            "materials" => Ok(Self::Materials),
            _ => Err(UnknownTagError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown tag: {0}")]
pub struct UnknownTagError(pub String);

/// Structured reading of a raw utterance, as returned by the language model.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRecord {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub valid: bool,
    #[serde(default, rename = "eventTime", deserialize_with = "lenient_text")]
    pub event_time_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_tag")]
    pub intent: Option<TriggerIntent>,
    #[serde(default, deserialize_with = "lenient_tag")]
    pub complexity: Option<Complexity>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub prep_required: bool,
    #[serde(default, deserialize_with = "lenient_dependencies")]
    pub dependencies: Vec<Dependency>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub urgent_minute_level: bool,
}

/// Phrases that mark imminent, minute level requests
const URGENT_TOKENS: [&str; 7] = ["分钟", "马上", "立刻", "立即", "现在", "过几分钟", "几分钟后"];

#[derive(Error, Debug)]
pub enum ParseRecordError {
    #[error("The language model returned an empty reply")]
    Empty,
    #[error("The language model reply is not a valid parse record: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ParseRecord {
    /// A record that rejects the utterance
    pub fn rejected() -> Self {
        Self::default()
    }

    /// Reads the JSON object produced by the model. Markdown code fences
    /// around the object are stripped and unknown fields are ignored.
    pub fn from_llm_reply(reply: &str) -> Result<Self, ParseRecordError> {
        let cleaned = strip_code_fences(reply);
        if cleaned.is_empty() {
            return Err(ParseRecordError::Empty);
        }
        Ok(serde_json::from_str(cleaned)?)
    }

    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }

    pub fn intent_or_default(&self) -> TriggerIntent {
        self.intent.unwrap_or_default()
    }

    pub fn complexity_or_default(&self) -> Complexity {
        self.complexity.unwrap_or_default()
    }

    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    /// Minute level language in the raw text always wins over what the
    /// model decided.
    pub fn enforce_urgent_language(&mut self, raw_input: &str) {
        if mentions_urgent_minutes(raw_input) {
            self.urgent_minute_level = true;
            self.intent = Some(TriggerIntent::AtTime);
        }
    }
}

pub fn mentions_urgent_minutes(raw_input: &str) -> bool {
    URGENT_TOKENS.iter().any(|token| raw_input.contains(token)) || mentions_pass_minutes(raw_input)
}

/// Matches "过X分钟" where X is any short run of characters, e.g. "过5分钟" or "过十分钟".
fn mentions_pass_minutes(raw_input: &str) -> bool {
    raw_input.match_indices('过').any(|(idx, _)| {
        raw_input[idx + '过'.len_utf8()..]
            .chars()
            .take(4)
            .collect::<String>()
            .contains('分')
    })
}

pub fn strip_code_fences(reply: &str) -> &str {
    let mut text = reply.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```JSON") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

fn lenient_tag<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s.parse::<T>().ok(),
        _ => None,
    })
}

fn lenient_dependencies<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Dependency>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let mut deps = match value {
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .filter_map(|tag| tag.parse::<Dependency>().ok())
            .collect::<Vec<_>>(),
        _ => Vec::new(),
    };
    deps.sort();
    deps.dedup();
    Ok(deps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fenced_reply_and_ignores_unknown_fields() {
        let reply = r#"```json
        {
            "eventTime": "2026-01-31 21:00:00",
            "summary": "开会",
            "valid": true,
            "intent": "AT_TIME",
            "complexity": "MEDIUM",
            "prepRequired": false,
            "dependencies": ["people", "spaceships", "people"],
            "urgentMinuteLevel": false,
            "confidence": 0.93
        }
        ```"#;
        let record = ParseRecord::from_llm_reply(reply).unwrap();
        assert!(record.valid);
        assert_eq!(record.event_time_text.as_deref(), Some("2026-01-31 21:00:00"));
        assert_eq!(record.summary(), "开会");
        assert_eq!(record.intent, Some(TriggerIntent::AtTime));
        assert_eq!(record.complexity, Some(Complexity::Medium));
        assert_eq!(record.dependencies, vec![Dependency::People]);
        assert!(!record.urgent_minute_level);
    }

    #[test]
    fn missing_and_unknown_values_fall_back_to_defaults() {
        let record =
            ParseRecord::from_llm_reply(r#"{"valid": true, "eventTime": null, "intent": "SOMEDAY"}"#)
                .unwrap();
        assert!(record.valid);
        assert_eq!(record.event_time_text, None);
        assert_eq!(record.intent, None);
        assert_eq!(record.intent_or_default(), TriggerIntent::Cushion);
        assert_eq!(record.complexity_or_default(), Complexity::Medium);
        assert!(!record.has_dependencies());
    }

    #[test]
    fn rejects_empty_or_broken_replies() {
        assert!(matches!(
            ParseRecord::from_llm_reply("```json\n```"),
            Err(ParseRecordError::Empty)
        ));
        assert!(matches!(
            ParseRecord::from_llm_reply("sure, here you go"),
            Err(ParseRecordError::Malformed(_))
        ));
    }

    #[test]
    fn urgent_language_forces_at_time() {
        let mut record = ParseRecord {
            valid: true,
            intent: Some(TriggerIntent::Cushion),
            ..Default::default()
        };
        record.enforce_urgent_language("5分钟后提醒我喝水");
        assert!(record.urgent_minute_level);
        assert_eq!(record.intent, Some(TriggerIntent::AtTime));

        for raw in ["马上去开门", "立刻回电话", "过十分钟叫我", "现在就提醒我"] {
            assert!(mentions_urgent_minutes(raw), "{}", raw);
        }
        assert!(!mentions_urgent_minutes("下周三交报告"));
        assert!(!mentions_urgent_minutes("过年回家"));
    }
}
