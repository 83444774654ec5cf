//! Review handoff payload.
//!
//! Written into the session's transient storage under
//! [`HANDOFF_STORAGE_KEY`](crate::defaults::HANDOFF_STORAGE_KEY) for a teammate
//! to pick up.

use chrono::{DateTime, Utc};
use pantry_ids::PantryId;
use serde::{Deserialize, Serialize};

use crate::defaults::HANDOFF_SOURCE;
use crate::inventory::Inventory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffPayload {
    pub pantry_id: PantryId,
    #[serde(with = "iso_millis")]
    pub reviewed_at: DateTime<Utc>,
    pub reviewed_inventory: Inventory,
    pub source: String,
}

impl HandoffPayload {
    pub fn new(pantry_id: PantryId, reviewed_at: DateTime<Utc>, inventory: Inventory) -> Self {
        Self {
            pantry_id,
            reviewed_at,
            reviewed_inventory: inventory,
            source: HANDOFF_SOURCE.to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2026-10-19T14:03:07.512Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
