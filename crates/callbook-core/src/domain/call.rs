use crate::domain::ids::{CallId, Revision};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw form input for a call that has not been persisted yet.
///
/// Every value is kept exactly as typed, including `duration_minutes`, so the
/// validator can report what was wrong with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CallDraft {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub call_status: String,
    #[serde(default)]
    pub comments: Option<String>,
    pub duration_minutes: String,
    pub agent_name: String,
    #[serde(default)]
    pub photo_uri: Option<String>,
}

/// Field values that passed validation and are ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFields {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub call_status: String,
    pub comments: Option<String>,
    pub duration_minutes: u8,
    pub agent_name: String,
    pub photo_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    pub id: CallId,
    #[serde(flatten)]
    pub fields: CallFields,
    pub created_at: DateTime<Utc>,
    pub revision: Revision,
}

/// Raw replacement values for an existing record. `None` leaves a field as is.
///
/// For `comments` and `photo_uri`, `Some("")` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CallPatch {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub call_status: Option<String>,
    pub comments: Option<String>,
    pub duration_minutes: Option<String>,
    pub agent_name: Option<String>,
    pub photo_uri: Option<String>,
}

impl CallPatch {
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.customer_phone.is_none()
            && self.customer_email.is_none()
            && self.call_status.is_none()
            && self.comments.is_none()
            && self.duration_minutes.is_none()
            && self.agent_name.is_none()
            && self.photo_uri.is_none()
    }
}

/// A validated patch. `Some(None)` on an optional field clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPatch {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub call_status: Option<String>,
    pub comments: Option<Option<String>>,
    pub duration_minutes: Option<u8>,
    pub agent_name: Option<String>,
    pub photo_uri: Option<Option<String>>,
}

impl FieldPatch {
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.customer_phone.is_none()
            && self.customer_email.is_none()
            && self.call_status.is_none()
            && self.comments.is_none()
            && self.duration_minutes.is_none()
            && self.agent_name.is_none()
            && self.photo_uri.is_none()
    }
}
