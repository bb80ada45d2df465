//! Response wrappers for stored documents.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use bson::Document;
use serde_json::Value;

use crate::models::document_to_json;

/// A single document, or `null` when nothing matched
#[derive(Debug, Clone)]
pub struct DocumentBody(pub Option<Document>);

impl IntoResponse for DocumentBody {
    fn into_response(self) -> Response {
        let body = self.0.map(document_to_json).unwrap_or(Value::Null);
        Json(body).into_response()
    }
}

#[derive(Debug, Clone)]
pub struct DocumentList(pub Vec<Document>);

impl IntoResponse for DocumentList {
    fn into_response(self) -> Response {
        let body: Vec<Value> = self.0.into_iter().map(document_to_json).collect();
        Json(body).into_response()
    }
}
