//! Document store access.
//!
//! Services talk to a [`DocumentStore`] trait object so the MongoDB-backed
//! store used in production and the in-memory store used by tests and local
//! runs are interchangeable.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, Document};
use serde::{Serialize, Serializer};
use thiserror::Error;

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Collections owned by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Groups,
    Posts,
    Comments,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Users,
        Collection::Groups,
        Collection::Posts,
        Collection::Comments,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Groups => "groups",
            Collection::Posts => "posts",
            Collection::Comments => "comments",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single-document modification.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Overwrite the given top-level fields
    Set(Document),
    /// Remove the given top-level fields
    Unset(Vec<String>),
    /// Append a value to an array field, creating the array if absent
    Push { field: String, value: Bson },
    /// Remove every array element that is a document matching `matching`
    Pull { field: String, matching: Document },
}

impl Update {
    /// Render the update in the store's operator syntax.
    pub fn into_document(self) -> Document {
        match self {
            Update::Set(fields) => doc! { "$set": fields },
            Update::Unset(fields) => {
                let fields: Document = fields.into_iter().map(|f| (f, Bson::String(String::new()))).collect();
                doc! { "$unset": fields }
            }
            Update::Push { field, value } => {
                let mut target = Document::new();
                target.insert(field, value);
                doc! { "$push": target }
            }
            Update::Pull { field, matching } => {
                let mut target = Document::new();
                target.insert(field, matching);
                doc! { "$pull": target }
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Backend(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Acknowledgement of an insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    #[serde(serialize_with = "serialize_object_id")]
    pub inserted_id: ObjectId,
}

impl InsertOutcome {
    pub fn new(inserted_id: ObjectId) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Acknowledgement of an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<()>,
}

impl UpdateOutcome {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_id: None,
        }
    }
}

/// Acknowledgement of a delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteOutcome {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Document store consumed by the services.
///
/// Filters are exact-match on top-level fields.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, StoreError>;

    async fn find(&self, collection: Collection, filter: Document)
        -> Result<Vec<Document>, StoreError>;

    /// Insert a document and return its `_id`, assigning one when absent.
    async fn insert_one(&self, collection: Collection, document: Document)
        -> Result<ObjectId, StoreError>;

    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        update: Update,
    ) -> Result<UpdateOutcome, StoreError>;

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<DeleteOutcome, StoreError>;

    /// Round-trip to the backend, used by health checks
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Filter addressing a document by its `_id`.
pub fn id_filter(id: ObjectId) -> Document {
    doc! { "_id": id }
}

pub fn serialize_object_id<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&id.to_hex())
}
