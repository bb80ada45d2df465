use bson::{doc, oid::ObjectId, Bson, Document};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::database::{
    id_filter, Collection, DeleteOutcome, DocumentStore, InsertOutcome, Update, UpdateOutcome,
};
use crate::error::{ApiError, Result};
use crate::middleware::metrics::track_group_promotion;
use crate::models::{strip_fields, JoinOutcome};

const MEMBERS_FIELD: &str = "membersInfo";
const PRIVILEGE_FIELDS: [&str; 2] = ["role", "admin"];

/// Service for group creation, membership and administration
#[derive(Clone)]
pub struct GroupService {
    store: Arc<dyn DocumentStore>,
}

impl GroupService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Promote the creator to admin and insert the group.
    ///
    /// If the insert fails, the creator's previous `role`/`admin` values are
    /// put back before the insert error is returned.
    pub async fn create(&self, creator_email: &str, payload: Document) -> Result<InsertOutcome> {
        let mut group = payload;
        strip_fields(&mut group, &["_id"]);

        let creator_filter = doc! { "email": creator_email };
        let previous = self
            .store
            .find_one(Collection::Users, creator_filter.clone())
            .await?;

        let promotion = self
            .store
            .update_one(
                Collection::Users,
                creator_filter,
                Update::Set(doc! { "role": "admin", "admin": true }),
            )
            .await?;

        if promotion.matched_count == 0 {
            warn!(email = %creator_email, "Group creator has no user record; nobody promoted");
        }

        match self.store.insert_one(Collection::Groups, group).await {
            Ok(group_id) => {
                if promotion.matched_count > 0 {
                    track_group_promotion(false);
                }
                info!(email = %creator_email, group_id = %group_id, "Group created");
                Ok(InsertOutcome::new(group_id))
            }
            Err(err) => {
                if let Some(previous) = previous {
                    self.restore_privileges(creator_email, &previous).await;
                    track_group_promotion(true);
                }
                Err(err.into())
            }
        }
    }

    /// Put back the `role`/`admin` values held in `previous`.
    async fn restore_privileges(&self, email: &str, previous: &Document) {
        let mut restored = Document::new();
        let mut absent = Vec::new();
        for field in PRIVILEGE_FIELDS {
            match previous.get(field) {
                Some(value) => {
                    restored.insert(field, value.clone());
                }
                None => absent.push(field.to_string()),
            }
        }

        let mut updates = Vec::new();
        if !restored.is_empty() {
            updates.push(Update::Set(restored));
        }
        if !absent.is_empty() {
            updates.push(Update::Unset(absent));
        }

        for update in updates {
            if let Err(err) = self
                .store
                .update_one(Collection::Users, doc! { "email": email }, update)
                .await
            {
                error!(email = %email, error = %err, "Failed to roll back group creator promotion");
                return;
            }
        }

        warn!(email = %email, "Group insert failed; creator promotion rolled back");
    }

    pub async fn list(&self) -> Result<Vec<Document>> {
        Ok(self.store.find(Collection::Groups, doc! {}).await?)
    }

    pub async fn get(&self, id: ObjectId) -> Result<Option<Document>> {
        Ok(self.store.find_one(Collection::Groups, id_filter(id)).await?)
    }

    /// Append a membership entry with a fresh id. Repeated joins are not deduplicated.
    pub async fn join(&self, id: ObjectId, payload: Document) -> Result<JoinOutcome> {
        let member_id = ObjectId::new();
        let mut entry = payload;
        entry.insert("_id", member_id);

        let update = self
            .store
            .update_one(
                Collection::Groups,
                id_filter(id),
                Update::Push {
                    field: MEMBERS_FIELD.to_string(),
                    value: Bson::Document(entry),
                },
            )
            .await?;

        debug!(group_id = %id, member_id = %member_id, matched = update.matched_count, "Join recorded");
        Ok(JoinOutcome { update, member_id })
    }

    /// Remove the membership entry whose `_id` is `member_id`.
    pub async fn remove_member(&self, id: ObjectId, member_id: ObjectId) -> Result<UpdateOutcome> {
        let update = self
            .store
            .update_one(
                Collection::Groups,
                id_filter(id),
                Update::Pull {
                    field: MEMBERS_FIELD.to_string(),
                    matching: doc! { "_id": member_id },
                },
            )
            .await?;

        info!(group_id = %id, member_id = %member_id, modified = update.modified_count, "Member removed");
        Ok(update)
    }

    /// Shallow overwrite of the supplied fields.
    pub async fn edit(&self, id: ObjectId, payload: Document) -> Result<UpdateOutcome> {
        let mut fields = payload;
        strip_fields(&mut fields, &["_id"]);
        if fields.is_empty() {
            return Err(ApiError::BadRequest("no fields to update".into()));
        }

        Ok(self
            .store
            .update_one(Collection::Groups, id_filter(id), Update::Set(fields))
            .await?)
    }

    pub async fn delete(&self, id: ObjectId) -> Result<DeleteOutcome> {
        let outcome = self
            .store
            .delete_one(Collection::Groups, id_filter(id))
            .await?;
        info!(group_id = %id, deleted = outcome.deleted_count, "Group deleted");
        Ok(outcome)
    }
}
