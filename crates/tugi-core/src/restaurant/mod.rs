//! Restaurant records and the read-only document store they are looked up from.
//!
//! The core never owns a store client: a [`RestaurantSource`] is injected into the
//! [`LookupGateway`], which applies the fail-open policy on top of it.

mod gateway;
mod store;

pub use gateway::{LookupGateway, LookupOutcome};
pub use store::RestaurantStore;

use serde::{Deserialize, Serialize};

/// Structured lookup criteria extracted from free text. At most one value per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// District name (e.g. "해운대").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Cuisine category (e.g. "돼지국밥").
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.kind.is_none()
    }

    /// True when every set field equals the record's field.
    pub fn matches(&self, record: &RestaurantRecord) -> bool {
        let location_ok = self.location.as_deref().map_or(true, |l| l == record.location);
        let kind_ok = self.kind.as_deref().map_or(true, |k| k == record.kind);
        location_ok && kind_ok
    }
}

/// Restaurant document as stored in the collection. Read-only once fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestaurantRecord {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub desc: String,
    pub image_url: String,
}

/// Projection of a record returned to the client (id and type dropped).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantSummary {
    pub name: String,
    pub desc: String,
    pub image_url: String,
    pub location: String,
}

impl From<&RestaurantRecord> for RestaurantSummary {
    fn from(record: &RestaurantRecord) -> Self {
        Self {
            name: record.name.clone(),
            desc: record.desc.clone(),
            image_url: record.image_url.clone(),
            location: record.location.clone(),
        }
    }
}

/// Failure of a document store query or of the local store itself.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sled: {0}")]
    Sled(#[from] sled::Error),
    #[error("cannot decode {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("seed file: {0}")]
    Seed(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("store returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Read-only query capability over the restaurant collection.
#[async_trait::async_trait]
pub trait RestaurantSource: Send + Sync {
    /// Backend name for logs and status.
    fn name(&self) -> &str;

    /// Records whose `location` and `type` equal every field set in `filter`.
    /// An empty filter returns the whole collection.
    async fn find(&self, filter: &Filter) -> Result<Vec<RestaurantRecord>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(location: &str, kind: &str) -> RestaurantRecord {
        RestaurantRecord {
            id: "r1".into(),
            name: "A".into(),
            location: location.into(),
            kind: kind.into(),
            desc: "d".into(),
            image_url: "u".into(),
        }
    }

    #[test]
    fn filter_matches_on_all_set_fields() {
        let both = Filter {
            location: Some("해운대".into()),
            kind: Some("돼지국밥".into()),
        };
        assert!(both.matches(&record("해운대", "돼지국밥")));
        assert!(!both.matches(&record("해운대", "카페")));
        assert!(!both.matches(&record("서면", "돼지국밥")));

        let location_only = Filter {
            location: Some("영도".into()),
            kind: None,
        };
        assert!(location_only.matches(&record("영도", "카페")));
        assert!(Filter::default().matches(&record("서면", "밀면")));
    }

    #[test]
    fn record_uses_type_as_wire_name() {
        let rec: RestaurantRecord = serde_json::from_value(serde_json::json!({
            "name": "A", "location": "해운대", "type": "돼지국밥", "desc": "d", "image_url": "u"
        }))
        .unwrap();
        assert_eq!(rec.kind, "돼지국밥");
        assert_eq!(rec.id, "");
    }

    #[test]
    fn summary_drops_id_and_type() {
        let summary = serde_json::to_value(RestaurantSummary::from(&record("해운대", "돼지국밥"))).unwrap();
        assert_eq!(
            summary,
            serde_json::json!({ "name": "A", "desc": "d", "image_url": "u", "location": "해운대" })
        );
    }
}
