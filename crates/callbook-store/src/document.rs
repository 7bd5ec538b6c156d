//! Fixed mapping between [`CallRecord`] and a stored document.
//!
//! | record field       | document field    | value     |
//! |--------------------|-------------------|-----------|
//! | `customer_name`    | `customerName`    | string    |
//! | `customer_phone`   | `customerPhone`   | string    |
//! | `customer_email`   | `customerEmail`   | string    |
//! | `call_status`      | `callStatus`      | string    |
//! | `comments`         | `comments`        | string, absent when empty |
//! | `duration_minutes` | `durationMinutes` | integer   |
//! | `agent_name`       | `agentName`       | string    |
//! | `photo_uri`        | `photoUri`        | string, absent when empty |
//! | `created_at`       | `createdAt`       | timestamp, written by the store |
//!
//! Decoding rejects documents with fields outside this table.

use crate::error::{Result, StoreError};
use callbook_core::{CallFields, CallId, CallRecord, FieldPatch, Revision};
use callbook_core::{MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub const FIELD_CUSTOMER_NAME: &str = "customerName";
pub const FIELD_CUSTOMER_PHONE: &str = "customerPhone";
pub const FIELD_CUSTOMER_EMAIL: &str = "customerEmail";
pub const FIELD_CALL_STATUS: &str = "callStatus";
pub const FIELD_COMMENTS: &str = "comments";
pub const FIELD_DURATION_MINUTES: &str = "durationMinutes";
pub const FIELD_AGENT_NAME: &str = "agentName";
pub const FIELD_PHOTO_URI: &str = "photoUri";
pub const FIELD_CREATED_AT: &str = "createdAt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    String(String),
    Integer(i64),
    Timestamp(DateTime<Utc>),
}

pub type Document = BTreeMap<String, FieldValue>;

/// Values to write plus the document fields they cover. A masked field with
/// no value is removed from the stored document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedPatch {
    pub values: Document,
    pub mask: Vec<&'static str>,
}

/// Encodes everything except `createdAt`, which only the store assigns.
pub fn encode_fields(fields: &CallFields) -> Document {
    let mut doc = Document::new();
    put_string(&mut doc, FIELD_CUSTOMER_NAME, &fields.customer_name);
    put_string(&mut doc, FIELD_CUSTOMER_PHONE, &fields.customer_phone);
    put_string(&mut doc, FIELD_CUSTOMER_EMAIL, &fields.customer_email);
    put_string(&mut doc, FIELD_CALL_STATUS, &fields.call_status);
    if let Some(comments) = &fields.comments {
        put_string(&mut doc, FIELD_COMMENTS, comments);
    }
    doc.insert(
        FIELD_DURATION_MINUTES.to_string(),
        FieldValue::Integer(i64::from(fields.duration_minutes)),
    );
    put_string(&mut doc, FIELD_AGENT_NAME, &fields.agent_name);
    if let Some(photo_uri) = &fields.photo_uri {
        put_string(&mut doc, FIELD_PHOTO_URI, photo_uri);
    }
    doc
}

pub fn encode_patch(patch: &FieldPatch) -> EncodedPatch {
    let mut encoded = EncodedPatch::default();
    let mut set = |name: &'static str, value: Option<FieldValue>| {
        encoded.mask.push(name);
        if let Some(value) = value {
            encoded.values.insert(name.to_string(), value);
        }
    };

    if let Some(value) = &patch.customer_name {
        set(FIELD_CUSTOMER_NAME, Some(FieldValue::String(value.clone())));
    }
    if let Some(value) = &patch.customer_phone {
        set(FIELD_CUSTOMER_PHONE, Some(FieldValue::String(value.clone())));
    }
    if let Some(value) = &patch.customer_email {
        set(FIELD_CUSTOMER_EMAIL, Some(FieldValue::String(value.clone())));
    }
    if let Some(value) = &patch.call_status {
        set(FIELD_CALL_STATUS, Some(FieldValue::String(value.clone())));
    }
    if let Some(value) = &patch.comments {
        set(FIELD_COMMENTS, value.clone().map(FieldValue::String));
    }
    if let Some(value) = patch.duration_minutes {
        set(
            FIELD_DURATION_MINUTES,
            Some(FieldValue::Integer(i64::from(value))),
        );
    }
    if let Some(value) = &patch.agent_name {
        set(FIELD_AGENT_NAME, Some(FieldValue::String(value.clone())));
    }
    if let Some(value) = &patch.photo_uri {
        set(FIELD_PHOTO_URI, value.clone().map(FieldValue::String));
    }
    encoded
}

pub fn decode_record(id: CallId, revision: Revision, mut doc: Document) -> Result<CallRecord> {
    let customer_name = take_string(&mut doc, FIELD_CUSTOMER_NAME)?;
    let customer_phone = take_string(&mut doc, FIELD_CUSTOMER_PHONE)?;
    let customer_email = take_string(&mut doc, FIELD_CUSTOMER_EMAIL)?;
    let call_status = take_string(&mut doc, FIELD_CALL_STATUS)?;
    let comments = take_optional_string(&mut doc, FIELD_COMMENTS)?;
    let duration_minutes = take_duration(&mut doc)?;
    let agent_name = take_string(&mut doc, FIELD_AGENT_NAME)?;
    let photo_uri = take_optional_string(&mut doc, FIELD_PHOTO_URI)?;
    let created_at = match doc.remove(FIELD_CREATED_AT) {
        Some(FieldValue::Timestamp(ts)) => ts,
        Some(_) => return Err(wrong_type(&id, FIELD_CREATED_AT)),
        None => return Err(missing(&id, FIELD_CREATED_AT)),
    };

    if let Some(unknown) = doc.keys().next() {
        return Err(StoreError::Schema(format!(
            "document {} has unknown field {}",
            id, unknown
        )));
    }

    Ok(CallRecord {
        id,
        fields: CallFields {
            customer_name,
            customer_phone,
            customer_email,
            call_status,
            comments,
            duration_minutes,
            agent_name,
            photo_uri,
        },
        created_at,
        revision,
    })
}

fn put_string(doc: &mut Document, name: &str, value: &str) {
    doc.insert(name.to_string(), FieldValue::String(value.to_string()));
}

fn take_string(doc: &mut Document, name: &'static str) -> Result<String> {
    match doc.remove(name) {
        Some(FieldValue::String(value)) => Ok(value),
        Some(_) => Err(StoreError::Schema(format!("field {} is not a string", name))),
        None => Err(StoreError::Schema(format!("missing field {}", name))),
    }
}

fn take_optional_string(doc: &mut Document, name: &'static str) -> Result<Option<String>> {
    match doc.remove(name) {
        Some(FieldValue::String(value)) if value.is_empty() => Ok(None),
        Some(FieldValue::String(value)) => Ok(Some(value)),
        Some(FieldValue::Null) | None => Ok(None),
        Some(_) => Err(StoreError::Schema(format!("field {} is not a string", name))),
    }
}

fn take_duration(doc: &mut Document) -> Result<u8> {
    let minutes = match doc.remove(FIELD_DURATION_MINUTES) {
        Some(FieldValue::Integer(value)) => value,
        Some(_) => {
            return Err(StoreError::Schema(format!(
                "field {} is not an integer",
                FIELD_DURATION_MINUTES
            )))
        }
        None => {
            return Err(StoreError::Schema(format!(
                "missing field {}",
                FIELD_DURATION_MINUTES
            )))
        }
    };
    if minutes < i64::from(MIN_DURATION_MINUTES) || minutes > i64::from(MAX_DURATION_MINUTES) {
        return Err(StoreError::Schema(format!(
            "field {} out of range: {}",
            FIELD_DURATION_MINUTES, minutes
        )));
    }
    u8::try_from(minutes).map_err(|_| {
        StoreError::Schema(format!(
            "field {} out of range: {}",
            FIELD_DURATION_MINUTES, minutes
        ))
    })
}

fn wrong_type(id: &CallId, name: &str) -> StoreError {
    StoreError::Schema(format!("document {} field {} has the wrong type", id, name))
}

fn missing(id: &CallId, name: &str) -> StoreError {
    StoreError::Schema(format!("document {} is missing {}", id, name))
}

#[cfg(test)]
mod tests {
    use super::{
        decode_record, encode_fields, encode_patch, FieldValue, FIELD_COMMENTS, FIELD_CREATED_AT,
        FIELD_DURATION_MINUTES, FIELD_PHOTO_URI,
    };
    use crate::error::StoreErrorKind;
    use callbook_core::{CallFields, CallId, FieldPatch, Revision};
    use chrono::{TimeZone, Utc};

    fn fields() -> CallFields {
        CallFields {
            customer_name: "Ada Lovelace".to_string(),
            customer_phone: "5551-2345".to_string(),
            customer_email: "ada@gmail.com".to_string(),
            call_status: "resolved".to_string(),
            comments: None,
            duration_minutes: 12,
            agent_name: "Grace Hopper".to_string(),
            photo_uri: Some("file:///photos/1.jpg".to_string()),
        }
    }

    fn id() -> CallId {
        CallId::new("doc-1").unwrap()
    }

    fn revision() -> Revision {
        Revision::new("1").unwrap()
    }

    #[test]
    fn encode_then_decode_restores_fields() {
        let created_at = Utc.with_ymd_and_hms(2030, 1, 15, 13, 45, 0).unwrap();
        let mut doc = encode_fields(&fields());
        assert!(!doc.contains_key(FIELD_COMMENTS));
        assert!(!doc.contains_key(FIELD_CREATED_AT));
        doc.insert(
            FIELD_CREATED_AT.to_string(),
            FieldValue::Timestamp(created_at),
        );

        let record = decode_record(id(), revision(), doc).expect("decode");
        assert_eq!(record.fields, fields());
        assert_eq!(record.created_at, created_at);
    }

    #[test]
    fn decode_rejects_unknown_fields() {
        let mut doc = encode_fields(&fields());
        doc.insert(
            FIELD_CREATED_AT.to_string(),
            FieldValue::Timestamp(Utc::now()),
        );
        doc.insert(
            "userEmail".to_string(),
            FieldValue::String("agent@gmail.com".to_string()),
        );
        let err = decode_record(id(), revision(), doc).unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Schema);
        assert!(err.to_string().contains("userEmail"));
    }

    #[test]
    fn decode_rejects_missing_timestamp_and_bad_duration() {
        let doc = encode_fields(&fields());
        let err = decode_record(id(), revision(), doc).unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Schema);

        let mut doc = encode_fields(&fields());
        doc.insert(
            FIELD_CREATED_AT.to_string(),
            FieldValue::Timestamp(Utc::now()),
        );
        doc.insert(FIELD_DURATION_MINUTES.to_string(), FieldValue::Integer(0));
        let err = decode_record(id(), revision(), doc).unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Schema);

        let mut doc = encode_fields(&fields());
        doc.insert(
            FIELD_CREATED_AT.to_string(),
            FieldValue::Timestamp(Utc::now()),
        );
        doc.insert(
            FIELD_DURATION_MINUTES.to_string(),
            FieldValue::String("12".to_string()),
        );
        assert!(decode_record(id(), revision(), doc).is_err());
    }

    #[test]
    fn patch_masks_cleared_fields_without_values() {
        let patch = FieldPatch {
            duration_minutes: Some(45),
            photo_uri: Some(None),
            ..Default::default()
        };
        let encoded = encode_patch(&patch);
        assert_eq!(encoded.mask, vec![FIELD_DURATION_MINUTES, FIELD_PHOTO_URI]);
        assert_eq!(
            encoded.values.get(FIELD_DURATION_MINUTES),
            Some(&FieldValue::Integer(45))
        );
        assert!(!encoded.values.contains_key(FIELD_PHOTO_URI));
    }
}
