//! Upstream target definitions and payload projection.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Default per-target deadline.
pub const DEFAULT_TIMEOUT_MS: u64 = 12_000;

/// A fixed upstream feed. Immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UpstreamTarget {
    /// Identifier used in logs, metrics and error messages.
    pub name: String,

    /// Absolute URL fetched with GET.
    pub url: String,

    /// Deadline for the whole request, body included.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// How the payload is shaped before it enters the envelope.
    #[serde(default)]
    pub parse: Projection,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl UpstreamTarget {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            parse: Projection::Full,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_projection(mut self, parse: Projection) -> Self {
        self.parse = parse;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Payload projection, written in config as `"full"` or `"field:<name>"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Projection {
    /// Keep the payload as-is.
    #[default]
    Full,
    /// Keep one array field, wrapped as `{ "<name>": [...] }`.
    Field(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid projection '{0}': expected \"full\" or \"field:<name>\"")]
pub struct ProjectionParseError(pub String);

impl Projection {
    /// Shape `payload` for the envelope.
    ///
    /// A missing or non-array field becomes an empty array; upstream shape
    /// changes never surface as errors here.
    pub fn apply(&self, payload: Value) -> Value {
        match self {
            Projection::Full => payload,
            Projection::Field(name) => {
                let items = match payload {
                    Value::Object(mut map) => match map.remove(name) {
                        Some(Value::Array(items)) => items,
                        _ => Vec::new(),
                    },
                    _ => Vec::new(),
                };
                let mut wrapper = Map::with_capacity(1);
                wrapper.insert(name.clone(), Value::Array(items));
                Value::Object(wrapper)
            }
        }
    }
}

impl FromStr for Projection {
    type Err = ProjectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "full" {
            return Ok(Projection::Full);
        }
        match s.strip_prefix("field:") {
            Some(name) if !name.trim().is_empty() => Ok(Projection::Field(name.trim().to_string())),
            _ => Err(ProjectionParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Projection {
    type Error = ProjectionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Projection> for String {
    fn from(value: Projection) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::Full => write!(f, "full"),
            Projection::Field(name) => write!(f, "field:{}", name),
        }
    }
}
