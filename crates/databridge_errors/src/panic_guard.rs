use databridge_core::EngineError;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Runs `fut` to completion, converting a panic into a `System` `EngineError`
/// instead of unwinding across the trait boundary. Used around driver calls
/// (`DataSource::execute`, `QueryBuilder` callbacks) since both are supplied
/// by code outside this engine's control.
pub async fn guard<Fut, T>(fut: Fut) -> Result<T, EngineError>
where
    Fut: Future<Output = Result<T, EngineError>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(&payload);
            Err(EngineError::system(format!("panic during execution: {message}")))
        }
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn converts_panic_into_system_error() {
        let result: Result<(), EngineError> = guard(async { panic!("driver exploded") }).await;
        let err = result.unwrap_err();
        assert_eq!(err.kind, databridge_core::ErrorKind::System);
        assert!(err.message.contains("driver exploded"));
    }

    #[tokio::test]
    async fn passes_through_ok_result() {
        let result = guard(async { Ok::<_, EngineError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
