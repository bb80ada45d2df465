//! In-memory document store.
//!
//! Mirrors the subset of the store semantics the services rely on:
//! exact-match filters, `$set`/`$unset`/`$push`/`$pull` and store-assigned
//! `_id`s. Used by the test suites and by `STORAGE_BACKEND=memory`.

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use dashmap::DashMap;

use super::{Collection, DeleteOutcome, DocumentStore, StoreError, Update, UpdateOutcome};

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<Collection, Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let collections = DashMap::new();
        for collection in Collection::ALL {
            collections.insert(collection, Vec::new());
        }
        Self { collections }
    }

    /// Number of documents currently held in `collection`
    pub fn len(&self, collection: Collection) -> usize {
        self.collections
            .get(&collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

/// Apply `update` to `document`, returning whether anything changed.
fn apply(document: &mut Document, update: Update) -> Result<bool, StoreError> {
    match update {
        Update::Set(fields) => {
            let mut modified = false;
            for (key, value) in fields {
                if key == "_id" && document.get(&key) != Some(&value) {
                    return Err(StoreError::InvalidDocument(
                        "field '_id' is immutable".to_string(),
                    ));
                }
                if document.get(&key) != Some(&value) {
                    document.insert(key, value);
                    modified = true;
                }
            }
            Ok(modified)
        }
        Update::Unset(fields) => {
            let mut modified = false;
            for key in fields {
                modified |= document.remove(&key).is_some();
            }
            Ok(modified)
        }
        Update::Push { field, value } => match document.get_mut(&field) {
            Some(Bson::Array(items)) => {
                items.push(value);
                Ok(true)
            }
            Some(_) => Err(StoreError::InvalidDocument(format!(
                "field '{}' is not an array",
                field
            ))),
            None => {
                document.insert(field, Bson::Array(vec![value]));
                Ok(true)
            }
        },
        Update::Pull { field, matching } => match document.get_mut(&field) {
            Some(Bson::Array(items)) => {
                let before = items.len();
                items.retain(|item| match item {
                    Bson::Document(entry) => !matches(entry, &matching),
                    _ => true,
                });
                Ok(items.len() != before)
            }
            Some(_) => Err(StoreError::InvalidDocument(format!(
                "field '{}' is not an array",
                field
            ))),
            None => Ok(false),
        },
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self.collections.get(&collection).and_then(|docs| {
            docs.iter()
                .find(|document| matches(document, &filter))
                .cloned()
        }))
    }

    async fn find(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|document| matches(document, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<ObjectId, StoreError> {
        let id = match document.get("_id") {
            Some(Bson::ObjectId(id)) => *id,
            Some(other) => {
                return Err(StoreError::InvalidDocument(format!(
                    "unsupported _id value {}",
                    other
                )))
            }
            None => ObjectId::new(),
        };

        let mut docs = self.collections.entry(collection).or_default();
        if docs
            .iter()
            .any(|existing| existing.get_object_id("_id").ok() == Some(id))
        {
            return Err(StoreError::Backend(format!(
                "duplicate key error collection: {} _id: {}",
                collection, id
            )));
        }

        let mut stored = Document::new();
        stored.insert("_id", id);
        for (key, value) in document {
            if key != "_id" {
                stored.insert(key, value);
            }
        }
        docs.push(stored);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        update: Update,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut docs = self.collections.entry(collection).or_default();
        match docs.iter_mut().find(|document| matches(document, &filter)) {
            Some(document) => {
                let modified = apply(document, update)?;
                Ok(UpdateOutcome::new(1, u64::from(modified)))
            }
            None => Ok(UpdateOutcome::new(0, 0)),
        }
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<DeleteOutcome, StoreError> {
        let mut docs = self.collections.entry(collection).or_default();
        match docs.iter().position(|document| matches(document, &filter)) {
            Some(index) => {
                docs.remove(index);
                Ok(DeleteOutcome::new(1))
            }
            None => Ok(DeleteOutcome::new(0)),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
