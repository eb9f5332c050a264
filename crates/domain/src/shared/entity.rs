use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

pub trait Entity {
    fn id(&self) -> &ID;
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

/// Server assigned identifier. Ids are handed out by the store in
/// increasing order, so a larger id was always accepted later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ID(i64);

impl ID {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// The id an entity carries before the store has assigned one
    pub fn unassigned() -> Self {
        Self(0)
    }

    pub fn is_assigned(&self) -> bool {
        self.0 > 0
    }

    pub fn inner(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ID {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for ID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug)]
pub enum InvalidIDError {
    #[error("ID: {0} is malformed")]
    Malformed(String),
}

impl FromStr for ID {
    type Err = InvalidIDError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(Self)
            .ok_or_else(|| InvalidIDError::Malformed(s.to_string()))
    }
}
