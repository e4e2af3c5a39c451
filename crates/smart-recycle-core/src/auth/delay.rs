use std::future::Future;
use std::time::Duration;

/// Simulated round-trip before login and registration resolve.
/// One wait per operation, never cancelled.
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// A wait the session manager suspends on before resolving an operation.
pub trait Delay {
    fn wait(&self) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer for a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::from_millis(DEFAULT_DELAY_MS)
    }
}

impl Delay for FixedDelay {
    fn wait(&self) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(self.0)
    }
}

/// Resolves immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn wait(&self) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_waits_full_duration() {
        let start = tokio::time::Instant::now();
        FixedDelay::default().wait().await;
        assert!(start.elapsed() >= Duration::from_millis(DEFAULT_DELAY_MS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_is_instant() {
        let start = tokio::time::Instant::now();
        NoDelay.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
