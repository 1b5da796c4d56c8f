use std::fmt;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    FromRow, Postgres,
};
use thiserror::Error;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type PgQueryAs<'q, R> = QueryAs<'q, Postgres, R, PgArguments>;

/// Value of a single column, used by the in-memory store for filtering and sorting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Date(Date),
}

impl FieldValue {
    pub fn text(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderBy {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = if self.descending { "DESC" } else { "ASC" };
        write!(f, "{} {}", self.column, dir)
    }
}

/// A stored record type together with the writable part used to create or replace it.
pub trait Record:
    fmt::Display + Clone + Serialize + Send + Sync + Unpin + for<'r> FromRow<'r, PgRow> + 'static
{
    type Draft: fmt::Debug + Clone + DeserializeOwned + Send + Sync + 'static;

    const TABLE: &'static str;
    /// Writable columns, in the order `bind_draft` binds them.
    const COLUMNS: &'static [&'static str];
    const UNIQUE: &'static [&'static str] = &[];
    /// Listing order; `None` means insertion order.
    const DEFAULT_ORDER: Option<OrderBy> = None;
    /// Timestamp column refreshed on every update.
    const TOUCHED_AT: Option<&'static str> = None;

    fn id(&self) -> Uuid;

    fn field(&self, column: &str) -> Option<FieldValue>;

    fn from_draft(id: Uuid, draft: Self::Draft, now: OffsetDateTime) -> Self;

    fn apply_draft(self, draft: Self::Draft, now: OffsetDateTime) -> Self;

    fn bind_draft<'q>(draft: &Self::Draft, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{table}.{column} must be unique")]
    Duplicate {
        table: &'static str,
        column: &'static str,
    },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistent collection of one record type.
///
/// `column` arguments are always static names taken from a resource's filter
/// table, never from request input.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<R>, StoreError>;

    async fn fetch_where(
        &self,
        column: &'static str,
        value: &str,
        order: Option<OrderBy>,
    ) -> Result<Vec<R>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<R>, StoreError>;

    async fn insert(&self, draft: R::Draft) -> Result<R, StoreError>;

    async fn update(&self, id: Uuid, draft: R::Draft) -> Result<Option<R>, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Removes every record. Calling it on an empty collection is a no-op.
    async fn reset(&self) -> Result<u64, StoreError>;
}
