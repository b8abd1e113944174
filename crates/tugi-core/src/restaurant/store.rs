//! Sled-backed restaurant collection: one tree, record id -> JSON document.

use super::{Filter, RestaurantRecord, RestaurantSource, StoreError};
use sled::{Db, Tree};
use std::path::Path;
use uuid::Uuid;

const TREE_NAME: &str = "restaurants";

/// Local document store for restaurant records.
pub struct RestaurantStore {
    _db: Db,
    tree: Tree,
}

impl RestaurantStore {
    /// Opens or creates the store at the given path.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let tree = db.open_tree(TREE_NAME)?;
        Ok(Self { _db: db, tree })
    }

    /// Inserts (or replaces) a record under its id. A blank id gets a fresh v4 UUID.
    /// Returns the id the record was stored under.
    pub fn insert(&self, record: &RestaurantRecord) -> Result<String, StoreError> {
        let mut record = record.clone();
        if record.id.trim().is_empty() {
            record.id = Uuid::new_v4().to_string();
        }
        let bytes = serde_json::to_vec(&record).map_err(|source| StoreError::Decode {
            key: record.id.clone(),
            source,
        })?;
        self.tree.insert(record.id.as_bytes(), bytes)?;
        Ok(record.id)
    }

    pub fn get(&self, id: &str) -> Result<Option<RestaurantRecord>, StoreError> {
        self.tree
            .get(id.as_bytes())?
            .map(|bytes| decode(id, &bytes))
            .transpose()
    }

    pub fn remove(&self, id: &str) -> Result<Option<RestaurantRecord>, StoreError> {
        self.tree
            .remove(id.as_bytes())?
            .map(|bytes| decode(id, &bytes))
            .transpose()
    }

    pub fn count(&self) -> usize {
        self.tree.len()
    }

    /// Every stored record, in key order.
    pub fn all(&self) -> Result<Vec<RestaurantRecord>, StoreError> {
        self.tree
            .iter()
            .map(|entry| {
                let (key, value) = entry?;
                decode(&String::from_utf8_lossy(&key), &value)
            })
            .collect()
    }

    /// Bulk-loads a JSON array of records. Returns how many were inserted.
    pub fn seed_from_json_path<P: AsRef<Path>>(&self, path: P) -> Result<usize, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Seed(format!("{}: {}", path.display(), e)))?;
        let records: Vec<RestaurantRecord> = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Seed(format!("{}: {}", path.display(), e)))?;
        for record in &records {
            self.insert(record)?;
        }
        self.tree.flush()?;
        Ok(records.len())
    }
}

fn decode(key: &str, bytes: &[u8]) -> Result<RestaurantRecord, StoreError> {
    let mut record: RestaurantRecord =
        serde_json::from_slice(bytes).map_err(|source| StoreError::Decode {
            key: key.to_string(),
            source,
        })?;
    if record.id.is_empty() {
        record.id = key.to_string();
    }
    Ok(record)
}

#[async_trait::async_trait]
impl RestaurantSource for RestaurantStore {
    fn name(&self) -> &str {
        "sled"
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<RestaurantRecord>, StoreError> {
        let records = self.all()?;
        Ok(records.into_iter().filter(|r| filter.matches(r)).collect())
    }
}
