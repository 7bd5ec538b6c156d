//! Firestore REST encoding for call documents.
//!
//! Builds request bodies and decodes responses without touching the network
//! so the mapping can be exercised on its own.

use crate::error::{RemoteError, Result};
use callbook_core::{CallFields, CallId, CallRecord, FieldPatch, Revision};
use callbook_store::document::{
    decode_record, encode_fields, encode_patch, Document, FieldValue, FIELD_CREATED_AT,
};
use callbook_store::{Precondition, SortDirection, StoreError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const SERVER_REQUEST_TIME: &str = "REQUEST_TIME";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WireValue {
    NullValue(()),
    StringValue(String),
    // int64 travels as a decimal string
    IntegerValue(String),
    TimestampValue(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDocument {
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, WireValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    pub writes: Vec<Write>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Write {
    pub update: WireDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_mask: Option<DocumentMask>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub update_transforms: Vec<FieldTransform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_document: Option<WirePrecondition>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMask {
    pub field_paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTransform {
    pub field_path: String,
    pub set_to_server_value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WirePrecondition {
    Exists(bool),
    UpdateTime(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    #[serde(default)]
    pub write_results: Vec<WriteResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    pub update_time: Option<String>,
    #[serde(default)]
    pub transform_results: Vec<WireValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunQueryItem {
    pub document: Option<WireDocument>,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

pub fn document_name(project_id: &str, collection: &str, id: &CallId) -> String {
    format!(
        "projects/{}/databases/(default)/documents/{}/{}",
        project_id, collection, id
    )
}

/// Create-only write that lets the server stamp `createdAt`.
pub fn create_request(
    project_id: &str,
    collection: &str,
    id: &CallId,
    fields: &CallFields,
) -> CommitRequest {
    CommitRequest {
        writes: vec![Write {
            update: WireDocument {
                name: document_name(project_id, collection, id),
                fields: to_wire_fields(&encode_fields(fields)),
                create_time: None,
                update_time: None,
            },
            update_mask: None,
            update_transforms: vec![FieldTransform {
                field_path: FIELD_CREATED_AT.to_string(),
                set_to_server_value: SERVER_REQUEST_TIME.to_string(),
            }],
            current_document: Some(WirePrecondition::Exists(false)),
        }],
    }
}

/// Masked write: only the patched fields are touched, cleared ones are
/// masked without a value so the server drops them.
pub fn update_request(
    project_id: &str,
    collection: &str,
    id: &CallId,
    patch: &FieldPatch,
    precondition: &Precondition,
) -> CommitRequest {
    let encoded = encode_patch(patch);
    let current_document = match precondition {
        Precondition::Exists => WirePrecondition::Exists(true),
        Precondition::Revision(revision) => WirePrecondition::UpdateTime(revision.to_string()),
    };
    CommitRequest {
        writes: vec![Write {
            update: WireDocument {
                name: document_name(project_id, collection, id),
                fields: to_wire_fields(&encoded.values),
                create_time: None,
                update_time: None,
            },
            update_mask: Some(DocumentMask {
                field_paths: encoded.mask.iter().map(|name| name.to_string()).collect(),
            }),
            update_transforms: Vec::new(),
            current_document: Some(current_document),
        }],
    }
}

pub fn list_query(collection: &str, direction: SortDirection) -> serde_json::Value {
    let direction = match direction {
        SortDirection::Ascending => "ASCENDING",
        SortDirection::Descending => "DESCENDING",
    };
    serde_json::json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "orderBy": [{
                "field": { "fieldPath": FIELD_CREATED_AT },
                "direction": direction,
            }],
        }
    })
}

pub fn record_from_create(
    response: CommitResponse,
    id: CallId,
    fields: &CallFields,
) -> Result<CallRecord> {
    let result = single_write_result(response)?;
    let revision = revision_from(result.update_time)?;
    let created_at = match result.transform_results.into_iter().next() {
        Some(WireValue::TimestampValue(raw)) => parse_timestamp(&raw)?,
        _ => {
            return Err(RemoteError::Parse(
                "commit response is missing the server timestamp".to_string(),
            ))
        }
    };
    Ok(CallRecord {
        id,
        fields: fields.clone(),
        created_at,
        revision,
    })
}

pub fn revision_from_update(response: CommitResponse) -> Result<Revision> {
    revision_from(single_write_result(response)?.update_time)
}

pub fn records_from_query(items: Vec<RunQueryItem>) -> std::result::Result<Vec<CallRecord>, StoreError> {
    items
        .into_iter()
        .filter_map(|item| item.document)
        .map(record_from_document)
        .collect()
}

pub fn record_from_document(document: WireDocument) -> std::result::Result<CallRecord, StoreError> {
    let id = document
        .name
        .rsplit('/')
        .next()
        .and_then(|raw| CallId::new(raw).ok())
        .ok_or_else(|| StoreError::Schema(format!("invalid document name {}", document.name)))?;
    let revision = revision_from(document.update_time)?;
    let fields = from_wire_fields(document.fields)?;
    decode_record(id, revision, fields)
}

/// Maps a non-success response onto the store's error kinds.
pub fn classify_error(status: u16, body: &str, id: Option<&CallId>) -> StoreError {
    let (message, code) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.message, envelope.error.status),
        Err(_) => (body.trim().to_string(), None),
    };
    let code = code.unwrap_or_default();

    if let Some(id) = id {
        if status == 404 || code == "NOT_FOUND" {
            return StoreError::NotFound(id.clone());
        }
        if status == 409 || code == "FAILED_PRECONDITION" || code == "ABORTED" {
            return StoreError::Conflict(id.clone());
        }
    }
    let reason = if message.is_empty() {
        format!("http status {}", status)
    } else {
        format!("http status {}: {}", status, message)
    };
    StoreError::unavailable(crate::firestore::BACKEND_NAME, reason)
}

pub fn to_wire_value(value: &FieldValue) -> WireValue {
    match value {
        FieldValue::Null => WireValue::NullValue(()),
        FieldValue::String(text) => WireValue::StringValue(text.clone()),
        FieldValue::Integer(number) => WireValue::IntegerValue(number.to_string()),
        FieldValue::Timestamp(ts) => {
            WireValue::TimestampValue(ts.to_rfc3339_opts(SecondsFormat::Micros, true))
        }
    }
}

pub fn from_wire_value(value: WireValue) -> Result<FieldValue> {
    match value {
        WireValue::NullValue(()) => Ok(FieldValue::Null),
        WireValue::StringValue(text) => Ok(FieldValue::String(text)),
        WireValue::IntegerValue(raw) => raw
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| RemoteError::Parse(format!("invalid integer value {}", raw))),
        WireValue::TimestampValue(raw) => parse_timestamp(&raw).map(FieldValue::Timestamp),
    }
}

fn to_wire_fields(doc: &Document) -> BTreeMap<String, WireValue> {
    doc.iter()
        .map(|(name, value)| (name.clone(), to_wire_value(value)))
        .collect()
}

fn from_wire_fields(fields: BTreeMap<String, WireValue>) -> Result<Document> {
    fields
        .into_iter()
        .map(|(name, value)| Ok((name, from_wire_value(value)?)))
        .collect()
}

fn single_write_result(response: CommitResponse) -> Result<WriteResult> {
    response
        .write_results
        .into_iter()
        .next()
        .ok_or_else(|| RemoteError::Parse("commit response has no write results".to_string()))
}

fn revision_from(update_time: Option<String>) -> Result<Revision> {
    update_time
        .and_then(|raw| Revision::new(raw).ok())
        .ok_or_else(|| RemoteError::Parse("missing updateTime".to_string()))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| RemoteError::Parse(format!("invalid timestamp {}", raw)))
}
