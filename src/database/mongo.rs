//! MongoDB-backed document store.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::Client;
use tracing::info;

use super::{Collection, DeleteOutcome, DocumentStore, StoreError, Update, UpdateOutcome};

/// One client per process; the driver pools connections internally.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db_name: String,
}

impl MongoStore {
    /// Connect and verify the deployment answers a ping.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        info!("Connecting to MongoDB database '{}'", db_name);

        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to connect to MongoDB: {}", e)))?;

        let store = Self {
            client,
            db_name: db_name.to_string(),
        };
        store.ping().await?;

        info!("Connected to MongoDB database '{}'", db_name);
        Ok(store)
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.client
            .database(&self.db_name)
            .collection::<Document>(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self.collection(collection).find_one(filter).await?)
    }

    async fn find(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Vec<Document>, StoreError> {
        let cursor = self.collection(collection).find(filter).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<ObjectId, StoreError> {
        let result = self.collection(collection).insert_one(document).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::InvalidDocument("inserted _id is not an ObjectId".into()))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        update: Update,
    ) -> Result<UpdateOutcome, StoreError> {
        let result = self
            .collection(collection)
            .update_one(filter, update.into_document())
            .await?;
        Ok(UpdateOutcome::new(result.matched_count, result.modified_count))
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<DeleteOutcome, StoreError> {
        let result = self.collection(collection).delete_one(filter).await?;
        Ok(DeleteOutcome::new(result.deleted_count))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Backend(format!("MongoDB ping failed: {}", e)))?;
        Ok(())
    }
}
