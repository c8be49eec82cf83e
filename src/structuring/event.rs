//! Structured event record produced by the oracle

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Event category as understood by the ingestion API.
///
/// Replies are not validated: a category string outside the nine known values
/// is carried through verbatim as `Unlisted`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventCategory {
    Cultural,
    Sports,
    Business,
    Technology,
    Entertainment,
    Education,
    Health,
    Environment,
    Other,
    Unlisted(String),
}

impl EventCategory {
    /// The nine categories the oracle is asked to choose from
    pub const LISTED: [EventCategory; 9] = [
        EventCategory::Cultural,
        EventCategory::Sports,
        EventCategory::Business,
        EventCategory::Technology,
        EventCategory::Entertainment,
        EventCategory::Education,
        EventCategory::Health,
        EventCategory::Environment,
        EventCategory::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            EventCategory::Cultural => "CULTURAL",
            EventCategory::Sports => "SPORTS",
            EventCategory::Business => "BUSINESS",
            EventCategory::Technology => "TECHNOLOGY",
            EventCategory::Entertainment => "ENTERTAINMENT",
            EventCategory::Education => "EDUCATION",
            EventCategory::Health => "HEALTH",
            EventCategory::Environment => "ENVIRONMENT",
            EventCategory::Other => "OTHER",
            EventCategory::Unlisted(value) => value,
        }
    }

    /// Whether this is one of the nine enumerated values
    pub fn is_listed(&self) -> bool {
        !matches!(self, EventCategory::Unlisted(_))
    }
}

impl From<String> for EventCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "CULTURAL" => EventCategory::Cultural,
            "SPORTS" => EventCategory::Sports,
            "BUSINESS" => EventCategory::Business,
            "TECHNOLOGY" => EventCategory::Technology,
            "ENTERTAINMENT" => EventCategory::Entertainment,
            "EDUCATION" => EventCategory::Education,
            "HEALTH" => EventCategory::Health,
            "ENVIRONMENT" => EventCategory::Environment,
            "OTHER" => EventCategory::Other,
            _ => EventCategory::Unlisted(value),
        }
    }
}

impl From<EventCategory> for String {
    fn from(category: EventCategory) -> Self {
        match category {
            EventCategory::Unlisted(value) => value,
            listed => listed.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event normalized by the oracle.
///
/// Only the JSON shape of the reply is checked. Missing or `null` fields
/// become empty strings, non-string scalars are kept as their JSON text, and
/// keys outside the six known ones are carried in `extra` so they reach the
/// sink unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredEvent {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,

    #[serde(default, deserialize_with = "lenient_category")]
    pub category: EventCategory,

    /// `YYYY-MM-DD` when the oracle follows instructions; not checked
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: String,

    /// Any other keys the oracle returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An absent category, sent to the sink as `""`
impl Default for EventCategory {
    fn default() -> Self {
        EventCategory::Unlisted(String::new())
    }
}

/// `null` becomes `""`, strings pass through, other values keep their JSON text
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    })
}

fn lenient_category<'de, D>(deserializer: D) -> Result<EventCategory, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(EventCategory::from)
}
