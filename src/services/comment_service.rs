use bson::{doc, Document};
use std::sync::Arc;

use crate::database::{Collection, DocumentStore, InsertOutcome};
use crate::error::Result;
use crate::models::strip_fields;

/// Append-only comment log
#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn DocumentStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, payload: Document) -> Result<InsertOutcome> {
        let mut comment = payload;
        strip_fields(&mut comment, &["_id"]);
        let id = self.store.insert_one(Collection::Comments, comment).await?;
        Ok(InsertOutcome::new(id))
    }

    pub async fn list(&self) -> Result<Vec<Document>> {
        Ok(self.store.find(Collection::Comments, doc! {}).await?)
    }
}
