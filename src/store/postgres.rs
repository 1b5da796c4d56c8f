use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{OrderBy, Record, RecordStore, StoreError};

/// PostgreSQL-backed store. One pool serves every record type.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

// `seq` is a BIGSERIAL on every table and keeps insertion order stable.
fn order_clause(order: Option<OrderBy>) -> String {
    match order {
        Some(o) => format!("{o}, seq ASC"),
        None => "seq ASC".to_string(),
    }
}

fn placeholders(from: usize, count: usize) -> String {
    (from..from + count)
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert_sql<R: Record>() -> String {
    format!(
        "INSERT INTO {} (id, {}) VALUES ($1, {}) RETURNING *",
        R::TABLE,
        R::COLUMNS.join(", "),
        placeholders(2, R::COLUMNS.len())
    )
}

// $1 is the id; writable columns follow in `COLUMNS` order.
fn update_sql<R: Record>() -> String {
    let assignments = R::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ${}", c, i + 2))
        .chain(R::TOUCHED_AT.map(|c| format!("{c} = now()")))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {} WHERE id = $1 RETURNING *",
        R::TABLE,
        assignments
    )
}

/// Postgres names inline unique constraints `<table>_<column>_key`.
fn unique_column<R: Record>(constraint: &str) -> &'static str {
    R::UNIQUE
        .iter()
        .copied()
        .find(|c| constraint == format!("{}_{}_key", R::TABLE, c))
        .unwrap_or("id")
}

fn classify<R: Record>(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            let column = unique_column::<R>(constraint);
            warn!(table = R::TABLE, column, constraint, "unique violation");
            return StoreError::Duplicate {
                table: R::TABLE,
                column,
            };
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl<R: Record> RecordStore<R> for PgStore {
    async fn fetch_all(&self) -> Result<Vec<R>, StoreError> {
        let sql = format!(
            "SELECT * FROM {} ORDER BY {}",
            R::TABLE,
            order_clause(R::DEFAULT_ORDER)
        );
        let rows = sqlx::query_as::<_, R>(&sql).fetch_all(&self.db).await?;
        Ok(rows)
    }

    async fn fetch_where(
        &self,
        column: &'static str,
        value: &str,
        order: Option<OrderBy>,
    ) -> Result<Vec<R>, StoreError> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = $1 ORDER BY {}",
            R::TABLE,
            column,
            order_clause(order)
        );
        let rows = sqlx::query_as::<_, R>(&sql)
            .bind(value)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<R>, StoreError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", R::TABLE);
        let row = sqlx::query_as::<_, R>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn insert(&self, draft: R::Draft) -> Result<R, StoreError> {
        let sql = insert_sql::<R>();
        let query = sqlx::query_as::<_, R>(&sql).bind(Uuid::new_v4());
        let row = R::bind_draft(&draft, query)
            .fetch_one(&self.db)
            .await
            .map_err(classify::<R>)?;
        debug!(table = R::TABLE, id = %row.id(), "row inserted");
        Ok(row)
    }

    async fn update(&self, id: Uuid, draft: R::Draft) -> Result<Option<R>, StoreError> {
        let sql = update_sql::<R>();
        let query = sqlx::query_as::<_, R>(&sql).bind(id);
        let row = R::bind_draft(&draft, query)
            .fetch_optional(&self.db)
            .await
            .map_err(classify::<R>)?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", R::TABLE);
        let res = sqlx::query(&sql).bind(id).execute(&self.db).await?;
        Ok(res.rows_affected() > 0)
    }

    async fn reset(&self) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM {}", R::TABLE);
        let res = sqlx::query(&sql).execute(&self.db).await?;
        debug!(table = R::TABLE, removed = res.rows_affected(), "table cleared");
        Ok(res.rows_affected())
    }
}
