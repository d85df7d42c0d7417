use crate::coercion::process_value_for_database;
use crate::field_mapping::FieldMapping;
use crate::type_cache::FieldTypeCache;
use databridge_core::{
    EngineError, InterfaceInfoAccessor, Record, TableTarget, Transaction, TransactionProvider,
    WriteStatement,
};

/// The Field Mapper (spec §4.4): owns the per-interface field-type cache and
/// exposes the write primitives every sync strategy composes against a
/// transaction the caller controls.
#[derive(Default)]
pub struct FieldMapper {
    type_cache: FieldTypeCache,
}

impl FieldMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames columns per the interface's `field_mapping` and coerces every
    /// value against its declared (or heuristic) type. Rejects a row that,
    /// after mapping, carries an empty column name — §4.4 "empty column
    /// names are rejected as validation errors".
    pub fn map_and_coerce_rows(
        &self,
        interface: &dyn InterfaceInfoAccessor,
        rows: &[Record],
    ) -> Result<Vec<Record>, EngineError> {
        let mapping = FieldMapping::parse(interface.parse_config().field_mapping.as_ref());
        let mut mapped = Vec::with_capacity(rows.len());
        for row in rows {
            let renamed = mapping.apply(row);
            let mut coerced = Record::with_capacity(renamed.len());
            for (column, value) in &renamed {
                if column.trim().is_empty() {
                    return Err(EngineError::validation(
                        "mapped row has an empty column name",
                    ));
                }
                let value = process_value_for_database(&self.type_cache, interface, column, value);
                coerced.insert(column.clone(), value);
            }
            mapped.push(coerced);
        }
        Ok(mapped)
    }

    /// `UpdateTableData` (§4.4): replace all contents via a delete followed
    /// by an insert. Deliberately non-atomic — each half runs in its own
    /// transaction, per the reimplementation's decision to preserve the
    /// teacher-observed `test`-only best-effort behaviour (SPEC_FULL §4,
    /// design note in spec.md §9).
    pub async fn update_table_data(
        &self,
        provider: &dyn TransactionProvider,
        interface: &dyn InterfaceInfoAccessor,
        rows: &[Record],
    ) -> Result<u64, EngineError> {
        let mapped = self.map_and_coerce_rows(interface, rows)?;

        let delete_tx = provider.begin().await?;
        delete_tx
            .execute_write(WriteStatement::DeleteAll {
                table: interface.table_name().to_string(),
                schema: interface.schema_name().map(str::to_string),
            })
            .await?;
        delete_tx.commit().await?;

        let insert_tx = provider.begin().await?;
        let inserted = insert_tx
            .execute_write(WriteStatement::Insert {
                table: interface.table_name().to_string(),
                schema: interface.schema_name().map(str::to_string),
                rows: mapped,
            })
            .await?;
        insert_tx.commit().await?;
        Ok(inserted)
    }

    /// `ReplaceTableData` (§4.5 full sync): truncate-and-insert inside one
    /// transaction. Either the table ends with exactly `rows` or, on any
    /// failure, with its original contents.
    pub async fn replace_table_data(
        &self,
        provider: &dyn TransactionProvider,
        interface: &dyn InterfaceInfoAccessor,
        rows: &[Record],
    ) -> Result<u64, EngineError> {
        let mapped = self.map_and_coerce_rows(interface, rows)?;
        let tx = provider.begin().await?;
        let result = async {
            tx.execute_write(WriteStatement::DeleteAll {
                table: interface.table_name().to_string(),
                schema: interface.schema_name().map(str::to_string),
            })
            .await?;
            tx.execute_write(WriteStatement::Insert {
                table: interface.table_name().to_string(),
                schema: interface.schema_name().map(str::to_string),
                rows: mapped,
            })
            .await
        }
        .await;

        match result {
            Ok(inserted) => {
                tx.commit().await?;
                Ok(inserted)
            }
            Err(err) => {
                tx.rollback().await?;
                Err(err)
            }
        }
    }

    /// `UpsertTableData` (§4.5 incremental sync): per-row insert-on-conflict
    /// keyed on `target.primary_keys`. The reimplementation requires those
    /// keys be supplied explicitly on `TableTarget` rather than discovered
    /// from interface config (spec.md §9 Open Question).
    pub async fn upsert_table_data(
        &self,
        provider: &dyn TransactionProvider,
        interface: &dyn InterfaceInfoAccessor,
        target: &TableTarget,
        rows: &[Record],
    ) -> Result<u64, EngineError> {
        target.validate()?;
        let mapped = self.map_and_coerce_rows(interface, rows)?;
        let tx = provider.begin().await?;
        let result = tx
            .execute_write(WriteStatement::Upsert {
                table: target.table_name.clone(),
                schema: target.schema.clone(),
                primary_keys: target.primary_keys.clone(),
                rows: mapped,
            })
            .await;

        match result {
            Ok(updated) => {
                tx.commit().await?;
                Ok(updated)
            }
            Err(err) => {
                tx.rollback().await?;
                Err(err)
            }
        }
    }

    /// `InsertBatchDataWithTx` (§4.5/§4.6.4): transactional insert of a
    /// pre-collected batch against a transaction the caller already opened
    /// and will commit/roll back itself.
    pub async fn insert_batch_with_tx(
        &self,
        tx: &dyn Transaction,
        interface: &dyn InterfaceInfoAccessor,
        rows: &[Record],
    ) -> Result<u64, EngineError> {
        let mapped = self.map_and_coerce_rows(interface, rows)?;
        tx.execute_write(WriteStatement::Insert {
            table: interface.table_name().to_string(),
            schema: interface.schema_name().map(str::to_string),
            rows: mapped,
        })
        .await
    }

    /// `UpsertBatchDataWithTx` (§4.5/§4.6.4): transactional UPSERT of a
    /// batch, keyed on `target.primary_keys`.
    pub async fn upsert_batch_with_tx(
        &self,
        tx: &dyn Transaction,
        interface: &dyn InterfaceInfoAccessor,
        target: &TableTarget,
        rows: &[Record],
    ) -> Result<u64, EngineError> {
        target.validate()?;
        let mapped = self.map_and_coerce_rows(interface, rows)?;
        tx.execute_write(WriteStatement::Upsert {
            table: target.table_name.clone(),
            schema: target.schema.clone(),
            primary_keys: target.primary_keys.clone(),
            rows: mapped,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use databridge_core::{FieldDescriptor, InterfaceInfo, InterfaceRecord, ParseConfig, Value};
    use databridge_test_support::{InMemoryStore, InMemoryTransactionProvider};

    fn interface() -> InterfaceInfo {
        InterfaceInfo::Basic {
            record: InterfaceRecord {
                id: "if-1".to_string(),
                name: "orders".to_string(),
                schema_name: Some("public".to_string()),
                table_name: "orders".to_string(),
                interface_config: serde_json::json!({}),
                parse_config: ParseConfig::default(),
                table_fields: vec![FieldDescriptor {
                    name: "id".to_string(),
                    declared_type: "integer".to_string(),
                }],
                table_created: true,
            },
            data_source_id: "ds-1".to_string(),
        }
    }

    fn row(id: i64) -> Record {
        let mut r = Record::new();
        r.insert("id".to_string(), Value::Int(id));
        r
    }

    #[tokio::test]
    async fn replace_table_data_ends_with_exactly_new_rows() {
        let store = InMemoryStore::new();
        store.seed("public.orders", vec![row(99)]);
        let provider = InMemoryTransactionProvider::new(store.clone());
        let mapper = FieldMapper::new();
        let info = interface();

        let inserted = mapper
            .replace_table_data(&provider, &info, &[row(1), row(2)])
            .await
            .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(store.row_count("public.orders"), 2);
    }

    #[tokio::test]
    async fn replace_table_data_rolls_back_on_failure() {
        let store = InMemoryStore::new();
        store.seed("public.orders", vec![row(99)]);
        store.fail_next_insert("public.orders");
        let provider = InMemoryTransactionProvider::new(store.clone());
        let mapper = FieldMapper::new();
        let info = interface();

        let result = mapper.replace_table_data(&provider, &info, &[row(1)]).await;

        assert!(result.is_err());
        assert_eq!(store.row_count("public.orders"), 1);
    }

    #[tokio::test]
    async fn upsert_table_data_requires_primary_key() {
        let store = InMemoryStore::new();
        let provider = InMemoryTransactionProvider::new(store.clone());
        let mapper = FieldMapper::new();
        let info = interface();
        let target = TableTarget {
            schema: Some("public".to_string()),
            table_name: "orders".to_string(),
            primary_keys: vec![],
            columns: vec![FieldDescriptor {
                name: "id".to_string(),
                declared_type: "integer".to_string(),
            }],
        };

        let result = mapper
            .upsert_table_data(&provider, &info, &target, &[row(1)])
            .await;

        assert!(result.is_err());
    }
}
