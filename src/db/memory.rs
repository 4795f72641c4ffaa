//! Backend en memoria, usado en tests y con `STORAGE=memory`.

use async_trait::async_trait;
use mongodb::bson::Document;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::client::{compare_bson, DbError, DbResult, Direction, Query, QueryClient};

#[derive(Debug, Default)]
pub struct MemoryClient {
    tables: RwLock<HashMap<String, Vec<Document>>>,
    calls: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Número de llamadas recibidas (lecturas y escrituras)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Hace fallar todas las escrituras siguientes hasta que se vuelva a desactivar
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn check_writable(&self, table: &str) -> DbResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable(format!("writes to '{}' are failing", table)));
        }
        Ok(())
    }
}

#[async_trait]
impl QueryClient for MemoryClient {
    async fn select(&self, table: &str, query: &Query) -> DbResult<Vec<Document>> {
        self.record_call();
        let tables = self.tables.read().await;

        let mut rows: Vec<Document> = tables
            .get(table)
            .map(|rows| rows.iter().filter(|row| query.matches(row)).cloned().collect())
            .unwrap_or_default();

        if let Some((field, direction)) = &query.order {
            let null = mongodb::bson::Bson::Null;
            rows.sort_by(|a, b| {
                let ordering = compare_bson(a.get(field).unwrap_or(&null), b.get(field).unwrap_or(&null));
                match direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(usize::try_from(limit).unwrap_or(0));
        }

        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Document) -> DbResult<()> {
        self.record_call();
        self.check_writable(table)?;
        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .push(row);
        Ok(())
    }

    async fn update(&self, table: &str, query: &Query, changes: Document) -> DbResult<u64> {
        self.record_call();
        self.check_writable(table)?;
        let mut tables = self.tables.write().await;

        let mut matched = 0;
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| query.matches(row)) {
                for (key, value) in &changes {
                    row.insert(key.clone(), value.clone());
                }
                matched += 1;
            }
        }
        Ok(matched)
    }

    async fn delete(&self, table: &str, query: &Query) -> DbResult<u64> {
        self.record_call();
        self.check_writable(table)?;
        let mut tables = self.tables.write().await;

        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !query.matches(row));
        Ok((before - rows.len()) as u64)
    }

    async fn count(&self, table: &str, query: &Query) -> DbResult<u64> {
        self.record_call();
        let tables = self.tables.read().await;
        let count = tables
            .get(table)
            .map(|rows| rows.iter().filter(|row| query.matches(row)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn select_filters_orders_and_limits() {
        tokio_test::block_on(async {
            let db = MemoryClient::new();
            for (id, n) in [("a", 3), ("b", 1), ("c", 2)] {
                db.insert("restaurant_tables", doc! { "id": id, "table_number": n, "room_id": "r1" })
                    .await
                    .unwrap();
            }
            db.insert("restaurant_tables", doc! { "id": "d", "table_number": 9, "room_id": "r2" })
                .await
                .unwrap();

            let query = Query::new()
                .eq("room_id", "r1")
                .order("table_number", Direction::Asc)
                .limit(2);
            let rows = db.select("restaurant_tables", &query).await.unwrap();
            let ids: Vec<&str> = rows.iter().map(|r| r.get_str("id").unwrap()).collect();
            assert_eq!(ids, vec!["b", "c"]);
        });
    }

    #[test]
    fn update_and_delete_report_counts() {
        tokio_test::block_on(async {
            let db = MemoryClient::new();
            db.insert("rooms", doc! { "id": "r1", "name": "Patio" }).await.unwrap();

            let by_id = Query::new().eq("id", "r1");
            assert_eq!(db.update("rooms", &by_id, doc! { "name": "Garden" }).await.unwrap(), 1);
            let rows = db.select("rooms", &by_id).await.unwrap();
            assert_eq!(rows[0].get_str("name").unwrap(), "Garden");

            assert_eq!(db.delete("rooms", &by_id).await.unwrap(), 1);
            assert_eq!(db.count("rooms", &Query::new()).await.unwrap(), 0);
            assert_eq!(db.delete("missing", &by_id).await.unwrap(), 0);
        });
    }

    #[test]
    fn failing_writes_leave_rows_untouched() {
        tokio_test::block_on(async {
            let db = MemoryClient::new();
            db.insert("rooms", doc! { "id": "r1", "name": "Patio" }).await.unwrap();
            db.fail_writes(true);

            let by_id = Query::new().eq("id", "r1");
            assert!(db.update("rooms", &by_id, doc! { "name": "Garden" }).await.is_err());
            assert!(db.insert("rooms", doc! { "id": "r2" }).await.is_err());

            let rows = db.select("rooms", &Query::new()).await.unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].get_str("name").unwrap(), "Patio");
            assert_eq!(db.calls(), 4);
        });
    }
}
