use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One captured clipboard value. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    id: Uuid,
    text: String,
    #[serde(rename = "timestamp")]
    created_at: DateTime<Utc>,
}

impl Entry {
    pub fn new(text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            created_at: Utc::now(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_timestamp(text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// First eight hex digits of the id, enough to tell entries apart in a listing.
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }

    /// `query_lower` must already be lowercased.
    pub fn matches(&self, query_lower: &str) -> bool {
        self.text.to_lowercase().contains(query_lower)
    }
}
