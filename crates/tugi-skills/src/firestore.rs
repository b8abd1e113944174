//! Firestore-backed restaurant source using the REST `runQuery` endpoint.
//!
//! Collection: `artifacts/{app_id}/public/data/restaurants`. Each set filter field
//! becomes an `EQUAL` field filter; two filters are combined with `AND`.

use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tugi_core::{Filter, FirestoreConfig, RestaurantRecord, RestaurantSource, StoreError};

const FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com/v1";
const COLLECTION_ID: &str = "restaurants";

/// Read-only client for the restaurant collection of one Firestore project.
pub struct FirestoreSource {
    client: reqwest::Client,
    api_base: String,
    project_id: String,
    app_id: String,
    api_key: Option<String>,
}

impl FirestoreSource {
    pub fn new(config: &FirestoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: FIRESTORE_API_BASE.to_string(),
            project_id: config.project_id.clone(),
            app_id: config.app_id.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Points requests at another API base (e.g. the Firestore emulator).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// `runQuery` URL on the parent document of the collection.
    fn run_query_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/artifacts/{}/public/data:runQuery",
            self.api_base, self.project_id, self.app_id
        )
    }
}

fn field_filter(field: &str, value: &str) -> Value {
    json!({
        "fieldFilter": {
            "field": { "fieldPath": field },
            "op": "EQUAL",
            "value": { "stringValue": value }
        }
    })
}

/// `structuredQuery` body for the filter. The empty filter selects the whole collection.
fn structured_query(filter: &Filter) -> Value {
    let mut conditions = Vec::new();
    if let Some(location) = &filter.location {
        conditions.push(field_filter("location", location));
    }
    if let Some(kind) = &filter.kind {
        conditions.push(field_filter("type", kind));
    }

    let mut query = json!({ "from": [{ "collectionId": COLLECTION_ID }] });
    let condition = match conditions.len() {
        0 => None,
        1 => conditions.pop(),
        _ => Some(json!({ "compositeFilter": { "op": "AND", "filters": conditions } })),
    };
    if let Some(condition) = condition {
        query["where"] = condition;
    }
    json!({ "structuredQuery": query })
}

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: HashMap<String, Value>,
}

impl Document {
    fn string_field(&self, key: &str) -> String {
        self.fields
            .get(key)
            .and_then(|v| v.get("stringValue"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }

    fn into_record(self) -> RestaurantRecord {
        RestaurantRecord {
            id: self.name.rsplit('/').next().unwrap_or_default().to_string(),
            name: self.string_field("name"),
            location: self.string_field("location"),
            kind: self.string_field("type"),
            desc: self.string_field("desc"),
            image_url: self.string_field("image_url"),
        }
    }
}

/// Decodes a `runQuery` response body. Rows without a `document` (read-time only) are skipped.
fn decode_run_query(body: &str) -> Result<Vec<RestaurantRecord>, StoreError> {
    let items: Vec<RunQueryItem> = serde_json::from_str(body).map_err(|source| StoreError::Decode {
        key: "runQuery response".to_string(),
        source,
    })?;
    Ok(items
        .into_iter()
        .filter_map(|item| item.document)
        .map(Document::into_record)
        .collect())
}

#[async_trait::async_trait]
impl RestaurantSource for FirestoreSource {
    fn name(&self) -> &str {
        "firestore"
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<RestaurantRecord>, StoreError> {
        let mut request = self
            .client
            .post(self.run_query_url())
            .json(&structured_query(filter));
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        decode_run_query(&body)
    }
}
