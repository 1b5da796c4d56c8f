use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{FieldValue, OrderBy, Record, RecordStore, StoreError};

/// Process-local store keeping rows in insertion order.
pub struct MemoryStore<R> {
    rows: RwLock<Vec<R>>,
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<R: Record> MemoryStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(rows: &[R], candidate: &R) -> Result<(), StoreError> {
        for &column in R::UNIQUE {
            let value = candidate.field(column);
            let taken = rows
                .iter()
                .filter(|r| r.id() != candidate.id())
                .any(|r| r.field(column) == value);
            if taken {
                return Err(StoreError::Duplicate {
                    table: R::TABLE,
                    column,
                });
            }
        }
        Ok(())
    }
}

fn sort_rows<R: Record>(rows: &mut [R], order: Option<OrderBy>) {
    let Some(order) = order else { return };
    // stable: equal keys keep insertion order
    rows.sort_by(|a, b| {
        let ord = a.field(order.column).cmp(&b.field(order.column));
        if order.descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

#[async_trait]
impl<R: Record> RecordStore<R> for MemoryStore<R> {
    async fn fetch_all(&self) -> Result<Vec<R>, StoreError> {
        let mut rows = self.rows.read().await.clone();
        sort_rows(&mut rows, R::DEFAULT_ORDER);
        Ok(rows)
    }

    async fn fetch_where(
        &self,
        column: &'static str,
        value: &str,
        order: Option<OrderBy>,
    ) -> Result<Vec<R>, StoreError> {
        let mut rows: Vec<R> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| matches!(r.field(column), Some(FieldValue::Text(ref v)) if v == value))
            .cloned()
            .collect();
        sort_rows(&mut rows, order);
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<R>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.id() == id).cloned())
    }

    async fn insert(&self, draft: R::Draft) -> Result<R, StoreError> {
        let record = R::from_draft(Uuid::new_v4(), draft, OffsetDateTime::now_utc());
        let mut rows = self.rows.write().await;
        Self::check_unique(&rows, &record)?;
        rows.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, draft: R::Draft) -> Result<Option<R>, StoreError> {
        let mut rows = self.rows.write().await;
        let Some(pos) = rows.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };
        let updated = rows[pos]
            .clone()
            .apply_draft(draft, OffsetDateTime::now_utc());
        Self::check_unique(&rows, &updated)?;
        rows[pos] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        Ok(rows.len() < before)
    }

    async fn reset(&self) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().await;
        let removed = rows.len() as u64;
        rows.clear();
        Ok(removed)
    }
}
