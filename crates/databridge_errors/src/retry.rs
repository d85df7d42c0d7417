use crate::classify::is_recoverable;
use databridge_core::{CancellationToken, EngineError};
use std::future::Future;
use std::time::Duration;

/// Exponential backoff with jitter, mirroring the shape used by the driver
/// manager's own retry loop: `base * 2^attempt + jitter`, capped at `max`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `k` (k >= 1, 1-indexed per the engine's retry
    /// contract) is `base * 2^(k-1)`, plus jitter, capped at `max_delay`.
    fn delay_for(&self, attempt_k: u32) -> Duration {
        use rand::Rng;
        let exponent = attempt_k.saturating_sub(1).min(16);
        let exp = self.base_delay.saturating_mul(1u32 << exponent);
        let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..=self.base_delay.as_millis() as u64));
        exp.saturating_add(jitter).min(self.max_delay)
    }
}

/// Runs `op` up to `policy.max_attempts` times, sleeping with exponential
/// backoff between attempts, as long as the failure's `ErrorKind` is
/// recoverable and cancellation hasn't fired. Returns the last error once
/// attempts are exhausted or the failure is not recoverable.
pub async fn retry_with_backoff<F, Fut, T>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<T, EngineError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, EngineError>>,
{
    let mut attempt = 0;
    loop {
        if cancel.is_cancelled() {
            return Err(EngineError::system("operation cancelled"));
        }
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let recoverable = is_recoverable(err.kind, &err.message);
                if !recoverable || attempt + 1 >= policy.max_attempts {
                    return Err(err);
                }
                attempt += 1;
                let delay = policy.delay_for(attempt);
                log::warn!("retrying after recoverable error (attempt {attempt}/{}): {err}", policy.max_attempts);
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel.cancelled() => return Err(EngineError::system("operation cancelled during backoff")),
                }
            }
        }
    }
}
