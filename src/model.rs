//! Data models for the link registry
//!
//! `Link` is the stored entity. `LinkSummary` and `LinkDetail` are the public
//! projections returned by the API; only the detail view carries `updatedAt`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::code::validate_code;
use crate::error::RegistryError;

/// A short code and the URL it resolves to, as persisted in the store
///
/// Example stored value:
/// `{"code":"abc123","targetUrl":"https://example.com","clickCount":0,...}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Primary key, never mutated after creation
    pub code: String,

    /// Destination URL, validated at creation time
    pub target_url: String,

    /// Number of redirects served for this code
    #[serde(default)]
    pub click_count: u64,

    pub last_clicked_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation, clicks included
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Builds a fresh record with no clicks
    pub fn new(code: String, target_url: String, now: DateTime<Utc>) -> Self {
        Self {
            code,
            target_url,
            click_count: 0,
            last_clicked_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Counts one redirect at `now`.
    ///
    /// Stores call this inside their own critical section; it must never be
    /// applied to a copy read outside of one.
    pub fn record_click(&mut self, now: DateTime<Utc>) {
        self.click_count = self.click_count.saturating_add(1);
        self.last_clicked_at = Some(now);
        self.updated_at = now;
    }
}

/// Request payload for creating a link
///
/// # Example
/// ```json
/// {
///   "targetUrl": "https://example.com/very/long/url",
///   "code": "mycode1"  // Optional
/// }
/// ```
///
/// `url` is accepted as an alias for `targetUrl`. Built from the raw JSON body
/// through `TryFrom<Value>` so that every malformed body maps to a registry error.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub target_url: String,

    /// Caller-chosen code; a random one is generated when absent or empty
    pub code: Option<String>,
}

impl CreateRequest {
    pub fn new(target_url: impl Into<String>, code: Option<String>) -> Self {
        Self {
            target_url: target_url.into(),
            code,
        }
    }

    /// The requested code, treating an empty string as no code
    pub fn requested_code(&self) -> Option<&str> {
        self.code.as_deref().filter(|code| !code.is_empty())
    }
}

impl TryFrom<Value> for CreateRequest {
    type Error = RegistryError;

    /// A non-string `code` is a format error; a missing or non-string target is
    /// an invalid URL, reported after the code so a bad code always wins.
    fn try_from(body: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = body else {
            return Err(RegistryError::InvalidBody("expected a JSON object".to_string()));
        };

        let code = match fields.remove("code") {
            None | Some(Value::Null) => None,
            Some(Value::String(code)) => Some(code),
            Some(other) => return Err(RegistryError::InvalidFormat(other.to_string())),
        };

        let target = match fields.remove("targetUrl") {
            Some(target) => Some(target),
            None => fields.remove("url"),
        };
        match target {
            Some(Value::String(target_url)) => Ok(Self { target_url, code }),
            other => {
                if let Some(code) = code.as_deref().filter(|code| !code.is_empty()) {
                    validate_code(code)?;
                }
                let shown = match other {
                    Some(value) => value.to_string(),
                    None => "missing targetUrl".to_string(),
                };
                Err(RegistryError::InvalidUrl(shown))
            }
        }
    }
}

/// Link fields returned from create and list
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkSummary {
    pub code: String,
    pub target_url: String,
    pub click_count: u64,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for LinkSummary {
    fn from(link: Link) -> Self {
        Self {
            code: link.code,
            target_url: link.target_url,
            click_count: link.click_count,
            last_clicked_at: link.last_clicked_at,
            created_at: link.created_at,
        }
    }
}

/// Link fields returned from the single-record lookup
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkDetail {
    #[serde(flatten)]
    pub summary: LinkSummary,
    pub updated_at: DateTime<Utc>,
}

impl From<Link> for LinkDetail {
    fn from(link: Link) -> Self {
        let updated_at = link.updated_at;
        Self {
            summary: link.into(),
            updated_at,
        }
    }
}

/// Response returned after a successful delete
#[derive(Serialize, Deserialize, Debug)]
pub struct DeleteResponse {
    pub ok: bool,
    pub code: String,
}

/// Error body shared by every failing endpoint
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}
