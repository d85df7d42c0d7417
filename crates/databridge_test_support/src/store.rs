use async_trait::async_trait;
use databridge_core::{
    EngineError, Record, Transaction, TransactionProvider, Value, WatermarkQuery, WriteStatement,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn qualified(schema: &Option<String>, table: &str) -> String {
    match schema {
        Some(schema) => format!("{schema}.{table}"),
        None => table.to_string(),
    }
}

#[derive(Default)]
struct StoreState {
    tables: HashMap<String, Vec<Record>>,
    fail_next_insert: HashMap<String, bool>,
}

/// An in-memory stand-in for the target database, shared by a
/// `InMemoryTransactionProvider` and its transactions. Supports snapshot
/// rollback so `WrapWithTransaction`-style callers can be exercised without
/// a real database (§8 S5, the full-sync-atomicity property).
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, table: &str, rows: Vec<Record>) {
        self.state.lock().unwrap().tables.insert(table.to_string(), rows);
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.state.lock().unwrap().tables.get(table).cloned().unwrap_or_default()
    }

    /// Causes the next `Insert`/`Upsert` write against `table` to fail,
    /// simulating a driver fault partway through a batch (§8 S5).
    pub fn fail_next_insert(&self, table: &str) {
        self.state.lock().unwrap().fail_next_insert.insert(table.to_string(), true);
    }

    fn snapshot(&self) -> HashMap<String, Vec<Record>> {
        self.state.lock().unwrap().tables.clone()
    }

    fn restore(&self, snapshot: HashMap<String, Vec<Record>>) {
        self.state.lock().unwrap().tables = snapshot;
    }

    fn apply(&self, statement: WriteStatement) -> Result<u64, EngineError> {
        let mut state = self.state.lock().unwrap();
        match statement {
            WriteStatement::EnsureSchema { table, schema, .. } => {
                let key = qualified(&schema, &table);
                state.tables.entry(key).or_default();
                Ok(0)
            }
            WriteStatement::DeleteAll { table, schema } => {
                let key = qualified(&schema, &table);
                let removed = state.tables.get(&key).map(Vec::len).unwrap_or(0) as u64;
                state.tables.insert(key, Vec::new());
                Ok(removed)
            }
            WriteStatement::Insert { table, schema, rows } => {
                let key = qualified(&schema, &table);
                if state.fail_next_insert.remove(&key).unwrap_or(false) {
                    return Err(EngineError::query(format!("simulated insert failure on {key}")));
                }
                for row in &rows {
                    for (column, _) in row {
                        if column.trim().is_empty() {
                            return Err(EngineError::validation("insert with empty column name"));
                        }
                    }
                }
                let count = rows.len() as u64;
                state.tables.entry(key).or_default().extend(rows);
                Ok(count)
            }
            WriteStatement::Upsert { table, schema, primary_keys, rows } => {
                let key = qualified(&schema, &table);
                if state.fail_next_insert.remove(&key).unwrap_or(false) {
                    return Err(EngineError::query(format!("simulated upsert failure on {key}")));
                }
                let existing = state.tables.entry(key).or_default();
                let mut count = 0u64;
                for row in rows {
                    let matches = |candidate: &Record| {
                        primary_keys.iter().all(|pk| candidate.get(pk) == row.get(pk))
                    };
                    if let Some(slot) = existing.iter_mut().find(|r| matches(r)) {
                        *slot = row;
                    } else {
                        existing.push(row);
                    }
                    count += 1;
                }
                Ok(count)
            }
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::Int(x), Value::Float(y)) => (*x as f64).partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::Float(x), Value::Int(y)) => x.partial_cmp(&(*y as f64)).unwrap_or(Ordering::Equal),
        (Value::Time(x), Value::Time(y)) => x.cmp(y),
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        _ => a.as_str_lossy().cmp(&b.as_str_lossy()),
    }
}

#[async_trait]
impl WatermarkQuery for InMemoryStore {
    async fn max_value(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
    ) -> Result<Option<Value>, EngineError> {
        let key = qualified(&schema.map(str::to_string), table);
        let state = self.state.lock().unwrap();
        let Some(rows) = state.tables.get(&key) else {
            return Ok(None);
        };
        let max = rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter(|v| !v.is_null())
            .fold(None::<&Value>, |acc, v| match acc {
                None => Some(v),
                Some(current) if compare_values(v, current) == std::cmp::Ordering::Greater => Some(v),
                Some(current) => Some(current),
            })
            .cloned();
        Ok(max)
    }
}

/// A transaction against an `InMemoryStore`: writes apply immediately but a
/// pre-begin snapshot is restored on `rollback`, matching the rollback
/// guarantee `databridge_errors::run_in_transaction` depends on.
pub struct InMemoryTransaction {
    store: InMemoryStore,
    snapshot: HashMap<String, Vec<Record>>,
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    async fn execute_write(&self, statement: WriteStatement) -> Result<u64, EngineError> {
        self.store.apply(statement)
    }

    async fn commit(self: Box<Self>) -> Result<(), EngineError> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), EngineError> {
        self.store.restore(self.snapshot);
        Ok(())
    }
}

/// Opens `InMemoryTransaction`s against a shared `InMemoryStore`.
pub struct InMemoryTransactionProvider {
    store: InMemoryStore,
}

impl InMemoryTransactionProvider {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TransactionProvider for InMemoryTransactionProvider {
    async fn begin(&self) -> Result<Box<dyn Transaction>, EngineError> {
        Ok(Box::new(InMemoryTransaction {
            store: self.store.clone(),
            snapshot: self.store.snapshot(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use databridge_core::Value;

    fn row(id: i64) -> Record {
        let mut r = Record::new();
        r.insert("id".to_string(), Value::Int(id));
        r
    }

    #[tokio::test]
    async fn rollback_restores_pre_transaction_contents() {
        let store = InMemoryStore::new();
        store.seed("public.orders", vec![row(1)]);
        let provider = InMemoryTransactionProvider::new(store.clone());

        let tx = provider.begin().await.unwrap();
        tx.execute_write(WriteStatement::DeleteAll {
            table: "orders".to_string(),
            schema: Some("public".to_string()),
        })
        .await
        .unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(store.row_count("public.orders"), 1);
    }

    #[tokio::test]
    async fn upsert_updates_matching_primary_key() {
        let store = InMemoryStore::new();
        store.seed("public.orders", vec![row(1)]);
        let provider = InMemoryTransactionProvider::new(store.clone());

        let tx = provider.begin().await.unwrap();
        let mut updated = row(1);
        updated.insert("status".to_string(), Value::Str("shipped".to_string()));
        tx.execute_write(WriteStatement::Upsert {
            table: "orders".to_string(),
            schema: Some("public".to_string()),
            primary_keys: vec!["id".to_string()],
            rows: vec![updated, row(2)],
        })
        .await
        .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(store.row_count("public.orders"), 2);
    }
}
