use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Lead time ladder. Variants are ordered from the shortest lead time
/// to the longest, so moving "earlier" means moving to a higher index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriggerBucket {
    M0,
    M1,
    M5,
    M10,
    M15,
    M30,
    H1,
    H2,
    H4,
    H8,
    D1,
    D3,
    D7,
    D14,
    D30,
}

const LADDER: [TriggerBucket; 15] = [
    TriggerBucket::M0,
    TriggerBucket::M1,
    TriggerBucket::M5,
    TriggerBucket::M10,
    TriggerBucket::M15,
    TriggerBucket::M30,
    TriggerBucket::H1,
    TriggerBucket::H2,
    TriggerBucket::H4,
    TriggerBucket::H8,
    TriggerBucket::D1,
    TriggerBucket::D3,
    TriggerBucket::D7,
    TriggerBucket::D14,
    TriggerBucket::D30,
];

impl TriggerBucket {
    pub fn all() -> &'static [TriggerBucket] {
        &LADDER
    }

    fn index(&self) -> usize {
        *self as usize
    }

    /// How long before the event the reminder fires
    pub fn lead_time(&self) -> Duration {
        match self {
            Self::M0 => Duration::zero(),
            Self::M1 => Duration::minutes(1),
            Self::M5 => Duration::minutes(5),
            Self::M10 => Duration::minutes(10),
            Self::M15 => Duration::minutes(15),
            Self::M30 => Duration::minutes(30),
            Self::H1 => Duration::hours(1),
            Self::H2 => Duration::hours(2),
            Self::H4 => Duration::hours(4),
            Self::H8 => Duration::hours(8),
            Self::D1 => Duration::days(1),
            Self::D3 => Duration::days(3),
            Self::D7 => Duration::days(7),
            Self::D14 => Duration::days(14),
            Self::D30 => Duration::days(30),
        }
    }

    pub fn lead_time_millis(&self) -> i64 {
        self.lead_time().num_milliseconds()
    }

    /// One step more lead time. Saturates at `D30`.
    pub fn earlier(&self) -> Self {
        LADDER[(self.index() + 1).min(LADDER.len() - 1)]
    }

    /// One step less lead time. Saturates at `M0`.
    pub fn later(&self) -> Self {
        LADDER[self.index().saturating_sub(1)]
    }

    /// Positive steps move later, negative steps move earlier.
    pub fn shift(&self, steps: i64) -> Self {
        let target = self.index() as i64 - steps;
        let clamped = target.max(0).min(LADDER.len() as i64 - 1);
        LADDER[clamped as usize]
    }

    /// Minute level buckets are excluded from feedback learning
    pub fn is_minute_level(&self) -> bool {
        self.as_str().starts_with('M')
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M0 => "M0",
            Self::M1 => "M1",
            Self::M5 => "M5",
            Self::M10 => "M10",
            Self::M15 => "M15",
            Self::M30 => "M30",
            Self::H1 => "H1",
            Self::H2 => "H2",
            Self::H4 => "H4",
            Self::H8 => "H8",
            Self::D1 => "D1",
            Self::D3 => "D3",
            Self::D7 => "D7",
            Self::D14 => "D14",
            Self::D30 => "D30",
        }
    }
}

impl Display for TriggerBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown trigger bucket: {0}")]
pub struct InvalidBucketError(pub String);

impl FromStr for TriggerBucket {
    type Err = InvalidBucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LADDER
            .iter()
            .find(|b| b.as_str() == s.trim())
            .copied()
            .ok_or_else(|| InvalidBucketError(s.to_string()))
    }
}
