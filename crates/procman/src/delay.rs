//! Wall-clock waiting for `await_pid`, behind a trait so tests need not
//! sleep.

use std::time::Duration;
use tokio::time::Instant;

#[async_trait::async_trait]
pub trait Delay: Send + Sync {
    /// Wait for `duration` and return the time actually spent waiting.
    async fn wait(&self, duration: Duration) -> Duration;
}

/// Waits on the tokio timer, so paused test time applies.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

#[async_trait::async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) -> Duration {
        let began = Instant::now();
        tokio::time::sleep(duration).await;
        began.elapsed()
    }
}
