use databridge_core::{
    EngineError, InterfaceInfoAccessor, Record, SyncCounts, SyncResult, SyncStrategy, TableTarget,
    Transaction, TransactionProvider, WriteStatement,
};
use databridge_mapper::FieldMapper;
use std::sync::Arc;

const FULL_SYNC_SUB_BATCH_SIZE: usize = 1000;

async fn ensure_schema(tx: &dyn Transaction, target: &TableTarget) -> Result<(), EngineError> {
    tx.execute_write(WriteStatement::EnsureSchema {
        table: target.table_name.clone(),
        schema: target.schema.clone(),
        columns: target.columns.clone(),
    })
    .await?;
    Ok(())
}

/// The Sync Engine (spec §4.5): strategy dispatch over a single
/// transaction, schema assurance, truncate, and batched insert/upsert.
pub struct SyncEngine {
    mapper: Arc<FieldMapper>,
}

impl SyncEngine {
    pub fn new(mapper: Arc<FieldMapper>) -> Self {
        Self { mapper }
    }

    /// Dispatches to the strategy-specific run, per §4.5's three-way split.
    pub async fn run(
        &self,
        strategy: SyncStrategy,
        provider: &dyn TransactionProvider,
        interface: &dyn InterfaceInfoAccessor,
        target: &TableTarget,
        rows: &[Record],
    ) -> Result<SyncResult, EngineError> {
        match strategy {
            SyncStrategy::Full => self.full_sync(provider, interface, target, rows).await,
            SyncStrategy::Incremental => self.incremental_sync(provider, interface, target, rows).await,
            SyncStrategy::Realtime => self.realtime_sync(provider, interface, target, rows).await,
        }
    }

    /// Full sync (§4.5): within one transaction, assure schema, truncate,
    /// then insert in sub-batches of 1000. Any sub-batch failure aborts the
    /// whole run — §3 invariant 6, §8 property 1.
    pub async fn full_sync(
        &self,
        provider: &dyn TransactionProvider,
        interface: &dyn InterfaceInfoAccessor,
        target: &TableTarget,
        rows: &[Record],
    ) -> Result<SyncResult, EngineError> {
        target.validate()?;
        databridge_errors::run_in_transaction(provider, |tx| async move {
            ensure_schema(tx, target).await?;
            tx.execute_write(WriteStatement::DeleteAll {
                table: target.table_name.clone(),
                schema: target.schema.clone(),
            })
            .await?;

            let mut counts = SyncCounts { fetched: rows.len() as u64, ..SyncCounts::default() };
            for (index, chunk) in rows.chunks(FULL_SYNC_SUB_BATCH_SIZE).enumerate() {
                self.mapper
                    .insert_batch_with_tx(tx, interface, chunk)
                    .await
                    .map_err(|err| EngineError::sync(format!("batch {index} failed: {err}")))?;
                counts.inserted += chunk.len() as u64;
            }

            Ok(SyncResult { counts, pages_fetched: 0, new_watermark: None, warnings: Vec::new() })
        })
        .await
    }

    /// Incremental sync (§4.5): within one transaction, assure schema, then
    /// UPSERT every record keyed on `target.primary_keys`.
    pub async fn incremental_sync(
        &self,
        provider: &dyn TransactionProvider,
        interface: &dyn InterfaceInfoAccessor,
        target: &TableTarget,
        rows: &[Record],
    ) -> Result<SyncResult, EngineError> {
        target.validate()?;
        databridge_errors::run_in_transaction(provider, |tx| async move {
            ensure_schema(tx, target).await?;
            let updated = self.mapper.upsert_batch_with_tx(tx, interface, target, rows).await?;

            let counts = SyncCounts { fetched: rows.len() as u64, updated, ..SyncCounts::default() };
            Ok(SyncResult { counts, pages_fetched: 0, new_watermark: None, warnings: Vec::new() })
        })
        .await
    }

    /// Realtime sync (§4.5): within one transaction, assure schema, then
    /// treat each record as an independent UPSERT. A per-record failure
    /// counts against `counts.failed` but does not abort the transaction —
    /// the contrasting rule from full/incremental sync (§7 error
    /// propagation table).
    pub async fn realtime_sync(
        &self,
        provider: &dyn TransactionProvider,
        interface: &dyn InterfaceInfoAccessor,
        target: &TableTarget,
        rows: &[Record],
    ) -> Result<SyncResult, EngineError> {
        target.validate()?;
        databridge_errors::run_in_transaction(provider, |tx| async move {
            ensure_schema(tx, target).await?;

            let mut counts = SyncCounts { fetched: rows.len() as u64, ..SyncCounts::default() };
            let mut warnings = Vec::new();
            for row in rows {
                let single = std::slice::from_ref(row);
                match self.mapper.upsert_batch_with_tx(tx, interface, target, single).await {
                    Ok(n) => counts.updated += n,
                    Err(err) => {
                        counts.failed += 1;
                        warnings.push(format!("record failed: {err}"));
                    }
                }
            }

            Ok(SyncResult { counts, pages_fetched: 0, new_watermark: None, warnings })
        })
        .await
    }
}
