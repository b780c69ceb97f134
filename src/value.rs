use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The order being agreed upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Value {
    Attack,
    Retreat,
}

impl Value {
    /// What a general falls back to when no order wins a strict majority.
    pub const DEFAULT: Value = Value::Retreat;

    pub fn opposite(self) -> Self {
        match self {
            Value::Attack => Value::Retreat,
            Value::Retreat => Value::Attack,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Attack => write!(f, "Attack"),
            Value::Retreat => write!(f, "Retreat"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown order `{0}`, expected `attack` or `retreat`")]
pub struct ParseValueError(pub String);

impl FromStr for Value {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attack" => Ok(Value::Attack),
            "retreat" => Ok(Value::Retreat),
            _ => Err(ParseValueError(s.to_string())),
        }
    }
}
