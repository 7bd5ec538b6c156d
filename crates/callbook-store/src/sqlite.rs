use crate::backend::{DocumentBackend, Precondition, SortDirection};
use crate::clock::{Clock, SystemClock};
use crate::db;
use crate::error::{Result, StoreError};
use crate::migrate;
use callbook_core::{CallFields, CallId, CallRecord, FieldPatch, Revision};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Transaction};
use std::path::Path;
use uuid::Uuid;

const BACKEND_NAME: &str = "sqlite";
const INITIAL_REVISION: i64 = 1;
const SELECT_COLUMNS: &str = "id, customer_name, customer_phone, customer_email, call_status, comments, duration_minutes, agent_name, photo_uri, created_at, revision";

/// Local document store backed by a single SQLite file.
pub struct SqliteBackend {
    conn: Connection,
    clock: Box<dyn Clock>,
}

impl SqliteBackend {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open(path)?;
        Ok(Self {
            conn,
            clock: Box::new(SystemClock),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self {
            conn,
            clock: Box::new(SystemClock),
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn migrate(&self) -> Result<()> {
        migrate::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl DocumentBackend for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn insert(&self, fields: &CallFields) -> Result<CallRecord> {
        let tx = self.conn.unchecked_transaction()?;
        let created_at = issue_timestamp(&tx, self.clock.now())?;
        let id = CallId::new(Uuid::new_v4().simple().to_string())
            .map_err(|_| StoreError::Schema("generated an empty id".to_string()))?;

        tx.execute(
            "INSERT INTO calls (id, customer_name, customer_phone, customer_email, call_status, comments, duration_minutes, agent_name, photo_uri, created_at, revision)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                id.as_str(),
                fields.customer_name,
                fields.customer_phone,
                fields.customer_email,
                fields.call_status,
                fields.comments,
                i64::from(fields.duration_minutes),
                fields.agent_name,
                fields.photo_uri,
                created_at.timestamp_micros(),
                INITIAL_REVISION,
            ],
        )?;
        tx.commit()?;

        Ok(CallRecord {
            id,
            fields: fields.clone(),
            created_at,
            revision: revision_token(INITIAL_REVISION)?,
        })
    }

    fn fetch(&self, id: &CallId) -> Result<Option<CallRecord>> {
        let sql = format!("SELECT {} FROM calls WHERE id = ?1;", SELECT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(record_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    fn list(&self, direction: SortDirection) -> Result<Vec<CallRecord>> {
        let order = match direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        let sql = format!(
            "SELECT {} FROM calls ORDER BY created_at {};",
            SELECT_COLUMNS, order
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(record_from_row(row)?);
        }
        Ok(records)
    }

    fn update(
        &self,
        id: &CallId,
        patch: &FieldPatch,
        precondition: &Precondition,
    ) -> Result<Revision> {
        let mut assignments: Vec<(&'static str, Value)> = Vec::new();
        if let Some(value) = &patch.customer_name {
            assignments.push(("customer_name", Value::Text(value.clone())));
        }
        if let Some(value) = &patch.customer_phone {
            assignments.push(("customer_phone", Value::Text(value.clone())));
        }
        if let Some(value) = &patch.customer_email {
            assignments.push(("customer_email", Value::Text(value.clone())));
        }
        if let Some(value) = &patch.call_status {
            assignments.push(("call_status", Value::Text(value.clone())));
        }
        if let Some(value) = &patch.comments {
            assignments.push(("comments", optional_text(value)));
        }
        if let Some(value) = patch.duration_minutes {
            assignments.push(("duration_minutes", Value::Integer(i64::from(value))));
        }
        if let Some(value) = &patch.agent_name {
            assignments.push(("agent_name", Value::Text(value.clone())));
        }
        if let Some(value) = &patch.photo_uri {
            assignments.push(("photo_uri", optional_text(value)));
        }

        let mut sql = String::from("UPDATE calls SET ");
        let mut values = Vec::with_capacity(assignments.len() + 2);
        for (column, value) in assignments {
            values.push(value);
            sql.push_str(&format!("{} = ?{}, ", column, values.len()));
        }
        values.push(Value::Text(id.as_str().to_string()));
        sql.push_str(&format!("revision = revision + 1 WHERE id = ?{}", values.len()));

        // Tokens this backend never issued match no row.
        let expected = match precondition {
            Precondition::Exists => None,
            Precondition::Revision(expected) => Some(expected.as_str().parse::<i64>().ok()),
        };
        if let Some(Some(expected)) = expected {
            values.push(Value::Integer(expected));
            sql.push_str(&format!(" AND revision = ?{}", values.len()));
        }
        sql.push(';');

        let tx = self.conn.unchecked_transaction()?;
        if let Some(None) = expected {
            return Err(match current_revision(&tx, id)? {
                Some(_) => StoreError::Conflict(id.clone()),
                None => StoreError::NotFound(id.clone()),
            });
        }
        let updated = tx.execute(&sql, params_from_iter(values))?;
        let current = current_revision(&tx, id)?;
        if updated == 0 {
            return Err(match current {
                Some(_) => StoreError::Conflict(id.clone()),
                None => StoreError::NotFound(id.clone()),
            });
        }
        tx.commit()?;

        let revision = current.ok_or_else(|| StoreError::NotFound(id.clone()))?;
        revision_token(revision)
    }

    fn delete(&self, id: &CallId) -> Result<()> {
        self.conn
            .execute("DELETE FROM calls WHERE id = ?1;", [id.as_str()])?;
        Ok(())
    }
}

// Store clock: never issues the same or an earlier instant twice, even if the
// wall clock stalls or steps back.
fn issue_timestamp(tx: &Transaction<'_>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let last: i64 = tx.query_row("SELECT last_issued FROM store_clock LIMIT 1;", [], |row| {
        row.get(0)
    })?;
    let issued = now.timestamp_micros().max(last.saturating_add(1));
    tx.execute("UPDATE store_clock SET last_issued = ?1;", [issued])?;
    timestamp_from_micros(issued)
}

fn current_revision(tx: &Transaction<'_>, id: &CallId) -> Result<Option<i64>> {
    let revision = tx
        .query_row(
            "SELECT revision FROM calls WHERE id = ?1;",
            [id.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(revision)
}

fn record_from_row(row: &rusqlite::Row<'_>) -> Result<CallRecord> {
    let id_raw: String = row.get(0)?;
    let id = CallId::new(id_raw).map_err(|_| StoreError::Schema("empty call id".to_string()))?;
    let duration_raw: i64 = row.get(6)?;
    let duration_minutes = u8::try_from(duration_raw).map_err(|_| {
        StoreError::Schema(format!(
            "call {} has out of range duration {}",
            id, duration_raw
        ))
    })?;
    let created_at_raw: i64 = row.get(9)?;
    let revision_raw: i64 = row.get(10)?;

    Ok(CallRecord {
        fields: CallFields {
            customer_name: row.get(1)?,
            customer_phone: row.get(2)?,
            customer_email: row.get(3)?,
            call_status: row.get(4)?,
            comments: row.get(5)?,
            duration_minutes,
            agent_name: row.get(7)?,
            photo_uri: row.get(8)?,
        },
        created_at: timestamp_from_micros(created_at_raw)?,
        revision: revision_token(revision_raw)?,
        id,
    })
}

fn optional_text(value: &Option<String>) -> Value {
    match value {
        Some(text) => Value::Text(text.clone()),
        None => Value::Null,
    }
}

fn timestamp_from_micros(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_micros(micros)
        .ok_or_else(|| StoreError::Schema(format!("invalid timestamp {}", micros)))
}

fn revision_token(revision: i64) -> Result<Revision> {
    Revision::new(revision.to_string())
        .map_err(|_| StoreError::Schema("empty revision".to_string()))
}
