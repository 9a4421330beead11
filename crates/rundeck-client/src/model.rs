//! Wire types exchanged with the Rundeck API.
//!
//! JSON payloads come from the job listing, execution, and output endpoints;
//! job definitions arrive as YAML. Fields the client does not use are ignored
//! during decoding.

use serde::{Deserialize, Deserializer};

use crate::normalize::normalize;

/// Entry from the project job listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Job {
    /// Server-side job identifier.
    pub id: String,
    /// Human-readable job name.
    pub name: String,
    /// Free-form description, possibly multi-line.
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    /// Link to the job in the server UI.
    #[serde(default, deserialize_with = "nullable_string")]
    pub permalink: String,
    /// Normalized name used for display and lookup.
    #[serde(skip)]
    pub label: String,
}

impl Job {
    /// Fill [`Job::label`] from the job name.
    #[must_use]
    pub fn labelled(mut self) -> Self {
        self.label = normalize(&self.name);
        self
    }
}

/// Full definition of a single job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobDefinition {
    /// Human-readable job name.
    pub name: String,
    /// Free-form description.
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    /// Options accepted by the job, in declaration order.
    #[serde(default)]
    pub options: Vec<JobOption>,
    /// Normalized name, stamped after decoding.
    #[serde(skip)]
    pub label: String,
}

/// Named argument accepted by a job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobOption {
    /// Option name.
    pub name: String,
    /// Whether the option must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Free-form description.
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
}

/// Execution created by a run request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Activity {
    /// Numeric execution identifier.
    pub id: u64,
    /// Link to the execution in the server UI.
    #[serde(default, deserialize_with = "nullable_string")]
    pub permalink: String,
}

/// One line of execution output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogEntry {
    /// Log text.
    #[serde(default, deserialize_with = "nullable_string")]
    pub log: String,
}

/// Decoded response of the execution output endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputPage {
    /// New entries since the requested cursor.
    #[serde(default)]
    pub entries: Vec<LogEntry>,
    /// Byte offset to request next.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub offset: u64,
    /// Last-modified marker to request next.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub last_modified: u64,
    /// Set once the execution has finished and all output was delivered.
    #[serde(default)]
    pub completed: bool,
}

/// Polling position within an execution's output.
///
/// Values are always copied from the server; the client never computes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputCursor {
    /// Offset sent as the `offset` query parameter.
    pub offset: u64,
    /// Marker sent as the `lastmod` query parameter.
    pub last_modified: u64,
    /// Whether the server has reported completion.
    pub completed: bool,
}

impl OutputCursor {
    /// Adopt the position reported by a page.
    pub const fn advance(&mut self, page: &OutputPage) {
        self.offset = page.offset;
        self.last_modified = page.last_modified;
        self.completed = page.completed;
    }

    /// Whether `page` reports a position behind this cursor.
    #[must_use]
    pub const fn regressed_by(&self, page: &OutputPage) -> bool {
        page.offset < self.offset || page.last_modified < self.last_modified
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// The output endpoint sends numeric cursor fields as strings ("2260").
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
        Null(()),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                Ok(0)
            } else {
                text.parse().map_err(serde::de::Error::custom)
            }
        }
        Raw::Null(()) => Ok(0),
    }
}
