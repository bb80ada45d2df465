//! Wire shapes and conversions between store documents and JSON.
//!
//! Groups, posts, users and comments are schemaless: whatever object the
//! client sends is stored, and stored documents are returned as they are,
//! with ObjectIds rendered as 24-hex strings.

use bson::{oid::ObjectId, Bson, Document};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::auth::Role;
use crate::database::{serialize_object_id, InsertOutcome, UpdateOutcome};
use crate::error::{ApiError, Result};

/// Render a stored document as client-facing JSON.
pub fn document_to_json(document: Document) -> Value {
    Value::Object(
        document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::Document(document) => document_to_json(document),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Convert a client JSON object into a storable document.
pub fn json_to_document(object: Map<String, Value>) -> Result<Document> {
    Ok(bson::to_document(&object)?)
}

/// Accept only JSON objects as document payloads.
pub fn require_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(ApiError::BadRequest("request body must be a JSON object".into())),
    }
}

/// Drop fields a client may not choose for itself.
pub fn strip_fields(document: &mut Document, fields: &[&str]) {
    for field in fields {
        document.remove(*field);
    }
}

/// Result of joining a group: the update acknowledgement plus the new entry id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinOutcome {
    #[serde(flatten)]
    pub update: UpdateOutcome,
    #[serde(serialize_with = "serialize_object_id")]
    pub member_id: ObjectId,
}

/// Result of registering a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RegisterOutcome {
    Created(InsertOutcome),
    Exists { message: String },
}

impl RegisterOutcome {
    pub fn exists() -> Self {
        RegisterOutcome::Exists {
            message: "user already exist".to_string(),
        }
    }
}

/// Stored role of a user, `null` when unrecognised or absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleView {
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
