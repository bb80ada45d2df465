use bson::{doc, oid::ObjectId, Document};
use std::sync::Arc;
use tracing::info;

use crate::database::{id_filter, Collection, DocumentStore, InsertOutcome, Update, UpdateOutcome};
use crate::error::{ApiError, Result};
use crate::middleware::metrics::track_moderation_decision;
use crate::models::strip_fields;

/// Moderation outcome an admin may apply to a pending post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationDecision {
    Approved,
    Denied,
}

impl ModerationDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationDecision::Approved => "approved",
            ModerationDecision::Denied => "denied",
        }
    }
}

impl std::str::FromStr for ModerationDecision {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "approved" => Ok(ModerationDecision::Approved),
            "denied" => Ok(ModerationDecision::Denied),
            other => Err(ApiError::BadRequest(format!(
                "status must be \"approved\" or \"denied\", got {:?}",
                other
            ))),
        }
    }
}

/// Service for post submission and moderation
#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn DocumentStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Store a new post as pending; clients cannot choose its status.
    pub async fn create(&self, payload: Document) -> Result<InsertOutcome> {
        let mut post = payload;
        strip_fields(&mut post, &["_id", "status"]);

        let id = self.store.insert_one(Collection::Posts, post).await?;
        Ok(InsertOutcome::new(id))
    }

    pub async fn list(&self) -> Result<Vec<Document>> {
        Ok(self.store.find(Collection::Posts, doc! {}).await?)
    }

    pub async fn get(&self, id: ObjectId) -> Result<Option<Document>> {
        Ok(self.store.find_one(Collection::Posts, id_filter(id)).await?)
    }

    /// Apply a moderation decision. Unknown statuses write nothing.
    pub async fn transition(&self, id: ObjectId, status: &str) -> Result<UpdateOutcome> {
        let decision: ModerationDecision = status.parse()?;

        let outcome = self
            .store
            .update_one(
                Collection::Posts,
                id_filter(id),
                Update::Set(doc! { "status": decision.as_str() }),
            )
            .await?;

        track_moderation_decision(decision.as_str());
        info!(post_id = %id, decision = decision.as_str(), matched = outcome.matched_count, "Post moderated");
        Ok(outcome)
    }
}
