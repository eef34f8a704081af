use std::time::Duration;

use async_trait::async_trait;

/// Gate passed between consecutive remote writes to stay under the
/// destination's rate limit.
#[async_trait]
pub trait Throttle: Send + Sync {
    async fn wait(&self);
}

/// Waits the same amount of time before every call.
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Throttle for FixedDelay {
    async fn wait(&self) {
        tracing::info!(
            "Waiting {:.1} second(s) before the next request...",
            self.delay.as_secs_f64()
        );
        tokio::time::sleep(self.delay).await;
    }
}
