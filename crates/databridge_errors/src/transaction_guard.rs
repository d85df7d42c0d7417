use crate::panic_guard::guard;
use databridge_core::{EngineError, Transaction, TransactionProvider};
use std::future::Future;

/// Runs `body` inside a transaction opened from `provider`: commits on
/// success, rolls back on error or panic, and never swallows a rollback
/// failure — if rollback itself errors, that error is folded into the
/// message of the original failure so both stay visible.
pub async fn run_in_transaction<P, F, Fut, T>(provider: &P, body: F) -> Result<T, EngineError>
where
    P: TransactionProvider + ?Sized,
    F: FnOnce(&dyn Transaction) -> Fut,
    Fut: Future<Output = Result<T, EngineError>>,
{
    let tx = provider.begin().await?;
    match guard(body(tx.as_ref())).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                return Err(EngineError::transaction(format!(
                    "{err}; additionally, rollback failed: {rollback_err}"
                )));
            }
            Err(err)
        }
    }
}
