//! Response envelope for the merged endpoint.

use axum::body::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome flag plus either both payloads or an error message.
///
/// Build it through [`FeedEnvelope::success`] or [`FeedEnvelope::failure`];
/// each populates exactly one side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEnvelope {
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FeedEnvelope {
    pub fn success(fetched_at: DateTime<Utc>, primary: Value, secondary: Value) -> Self {
        Self {
            ok: true,
            fetched_at: Some(format_timestamp(fetched_at)),
            primary: Some(primary),
            secondary: Some(secondary),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            fetched_at: None,
            primary: None,
            secondary: None,
            error: Some(error.into()),
        }
    }

    pub fn to_bytes(&self) -> Result<Bytes, serde_json::Error> {
        serde_json::to_vec(self).map(Bytes::from)
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-05-01T08:30:00.125Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
