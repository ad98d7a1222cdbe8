use crate::id::RecordId;
use crate::schema::Document;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Record
///
/// A persisted resource instance: a store-assigned identifier plus the
/// validated field set. On the wire the fields flatten next to `id`, so a
/// user record serializes as `{"id": "...", "name": "...", "email": "...",
/// "age": 30}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: Document,
}

/// StoreError
///
/// Infrastructure-level failure of the persistence layer (connectivity,
/// timeout, constraint violation). Deliberately distinct from validation and
/// not-found outcomes; always surfaces as a 500 with the detail kept in the
/// logs.
#[derive(Debug)]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// RecordStore
///
/// The abstract contract for one resource collection's persistence. Handlers
/// depend on this trait only, which keeps them testable with a substitute
/// store implementation.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn RecordStore>`) safely shareable across Axum's task boundaries.
/// "Not found" is modeled as `Ok(None)`, never as an error.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Provisions the backing collection if it does not exist yet. Called at
    /// startup in the local environment only; no-op where nothing is needed.
    async fn ensure_collection(&self) -> Result<(), StoreError>;

    /// Persists a new record, assigning a fresh identifier.
    async fn create(&self, fields: Document) -> Result<Record, StoreError>;

    /// Enumerates the whole collection. An empty collection yields an empty
    /// vector, not an error. No ordering guarantee.
    async fn find_all(&self) -> Result<Vec<Record>, StoreError>;

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Record>, StoreError>;

    /// Merges the named fields over the existing record. An empty patch is a
    /// valid no-op write returning the unchanged record.
    async fn update(&self, id: &RecordId, fields: Document) -> Result<Option<Record>, StoreError>;

    /// Removes the record and returns its last state. The identifier is no
    /// longer resolvable afterwards.
    async fn delete_by_id(&self, id: &RecordId) -> Result<Option<Record>, StoreError>;
}

/// The concrete type used to share a collection's store across the
/// application state.
pub type StoreState = Arc<dyn RecordStore>;

/// PostgresRecordStore
///
/// The concrete implementation backed by Postgres, one table per resource
/// collection holding the documents as JSONB:
/// `(id TEXT PRIMARY KEY, fields JSONB NOT NULL)`.
///
/// Queries use the runtime API because the table name varies per instance;
/// table names come from static declarations in the bootstrap, never from
/// request input.
pub struct PostgresRecordStore {
    pool: PgPool,
    table: &'static str,
}

impl PostgresRecordStore {
    pub fn new(pool: PgPool, table: &'static str) -> Self {
        Self { pool, table }
    }

    fn record_from_row(row: &PgRow) -> Result<Record, StoreError> {
        let id: String = row.try_get("id")?;
        let fields: serde_json::Value = row.try_get("fields")?;
        let id = RecordId::parse(&id)
            .map_err(|_| StoreError::new(format!("stored id is not a valid token: {id}")))?;
        let fields: Document = serde_json::from_value(fields)
            .map_err(|e| StoreError::new(format!("stored document failed to decode: {e}")))?;
        Ok(Record { id, fields })
    }

    fn fields_to_json(fields: &Document) -> Result<serde_json::Value, StoreError> {
        serde_json::to_value(fields)
            .map_err(|e| StoreError::new(format!("document failed to encode: {e}")))
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn ensure_collection(&self) -> Result<(), StoreError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, fields JSONB NOT NULL)",
            self.table
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    async fn create(&self, fields: Document) -> Result<Record, StoreError> {
        let id = RecordId::generate();
        let sql = format!("INSERT INTO {} (id, fields) VALUES ($1, $2)", self.table);
        sqlx::query(&sql)
            .bind(id.as_str())
            .bind(Self::fields_to_json(&fields)?)
            .execute(&self.pool)
            .await?;
        Ok(Record { id, fields })
    }

    async fn find_all(&self) -> Result<Vec<Record>, StoreError> {
        let sql = format!("SELECT id, fields FROM {}", self.table);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(Self::record_from_row).collect()
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Record>, StoreError> {
        let sql = format!("SELECT id, fields FROM {} WHERE id = $1", self.table);
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::record_from_row).transpose()
    }

    async fn update(&self, id: &RecordId, fields: Document) -> Result<Option<Record>, StoreError> {
        // JSONB concatenation gives the merge semantics: only the named
        // fields are overwritten, and `|| '{}'` leaves the row unchanged.
        let sql = format!(
            "UPDATE {} SET fields = fields || $2 WHERE id = $1 RETURNING id, fields",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .bind(Self::fields_to_json(&fields)?)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::record_from_row).transpose()
    }

    async fn delete_by_id(&self, id: &RecordId) -> Result<Option<Record>, StoreError> {
        let sql = format!(
            "DELETE FROM {} WHERE id = $1 RETURNING id, fields",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::record_from_row).transpose()
    }
}

/// MemoryRecordStore
///
/// An in-memory implementation used by the test suite and available for
/// running the service without a database. `new_failing` simulates an
/// infrastructure outage so the 500 path stays testable without network
/// faults.
pub struct MemoryRecordStore {
    records: Mutex<BTreeMap<String, Document>>,
    should_fail: bool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
            should_fail: false,
        }
    }

    pub fn new_failing() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
            should_fail: true,
        }
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.should_fail {
            Err(StoreError::new("simulated store failure"))
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn ensure_collection(&self) -> Result<(), StoreError> {
        self.check_available()
    }

    async fn create(&self, fields: Document) -> Result<Record, StoreError> {
        self.check_available()?;
        let id = RecordId::generate();
        let mut records = self.records.lock().expect("record store mutex poisoned");
        records.insert(id.as_str().to_string(), fields.clone());
        Ok(Record { id, fields })
    }

    async fn find_all(&self) -> Result<Vec<Record>, StoreError> {
        self.check_available()?;
        let records = self.records.lock().expect("record store mutex poisoned");
        records
            .iter()
            .map(|(id, fields)| {
                let id = RecordId::parse(id)
                    .map_err(|_| StoreError::new("stored id is not a valid token"))?;
                Ok(Record { id, fields: fields.clone() })
            })
            .collect()
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Record>, StoreError> {
        self.check_available()?;
        let records = self.records.lock().expect("record store mutex poisoned");
        Ok(records.get(id.as_str()).map(|fields| Record {
            id: id.clone(),
            fields: fields.clone(),
        }))
    }

    async fn update(&self, id: &RecordId, fields: Document) -> Result<Option<Record>, StoreError> {
        self.check_available()?;
        let mut records = self.records.lock().expect("record store mutex poisoned");
        match records.get_mut(id.as_str()) {
            Some(existing) => {
                existing.extend(fields);
                Ok(Some(Record {
                    id: id.clone(),
                    fields: existing.clone(),
                }))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: &RecordId) -> Result<Option<Record>, StoreError> {
        self.check_available()?;
        let mut records = self.records.lock().expect("record store mutex poisoned");
        Ok(records.remove(id.as_str()).map(|fields| Record {
            id: id.clone(),
            fields,
        }))
    }
}
