use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

/// Named collections held by the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Workshops,
    OnlineWorkshops,
    Landings,
    Itineraries,
    Accounts,
    Enrollments,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Workshops => "workshops",
            Collection::OnlineWorkshops => "online_workshops",
            Collection::Landings => "landings",
            Collection::Itineraries => "itineraries",
            Collection::Accounts => "accounts",
            Collection::Enrollments => "enrollments",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    /// A top-level field of the document body
    Field(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub const NEWEST_FIRST: SortSpec = SortSpec {
        key: SortKey::CreatedAt,
        direction: SortDirection::Descending,
    };

    pub const fn ascending(field: &'static str) -> Self {
        SortSpec {
            key: SortKey::Field(field),
            direction: SortDirection::Ascending,
        }
    }
}

/// A stored document: an arbitrary JSON body plus store-managed identity and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub body: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Body merged with `_id`, `createdAt` and `updatedAt`, the shape clients see.
    pub fn to_json(&self) -> Value {
        let mut map = match &self.body {
            Value::Object(map) => map.clone(),
            other => {
                let mut map = serde_json::Map::new();
                map.insert("body".to_string(), other.clone());
                map
            }
        };
        map.insert("_id".to_string(), Value::String(self.id.to_string()));
        map.insert(
            "createdAt".to_string(),
            Value::String(self.created_at.to_rfc3339()),
        );
        map.insert(
            "updatedAt".to_string(),
            Value::String(self.updated_at.to_rfc3339()),
        );
        Value::Object(map)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_json() {
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in &map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            other => other.serialize(serializer),
        }
    }
}

/// Strip store-managed keys a client may echo back in a write payload.
pub fn strip_managed_keys(body: &mut Value) {
    if let Value::Object(map) = body {
        map.remove("_id");
        map.remove("id");
        map.remove("createdAt");
        map.remove("updatedAt");
        map.remove("__v");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_json_merges_identity() {
        let now = Utc::now();
        let doc = Document {
            id: Uuid::new_v4(),
            body: json!({"header": {"title": "Ladakh"}}),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["_id"], doc.id.to_string());
        assert_eq!(json["header"]["title"], "Ladakh");
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_strip_managed_keys() {
        let mut body = json!({"_id": "x", "createdAt": "y", "title": "kept"});
        strip_managed_keys(&mut body);
        assert_eq!(body, json!({"title": "kept"}));
    }
}
