//! Scheduling between consecutive transfers on one network.

use std::time::Duration;

/// Decides how long to wait after a transfer attempt before the next one.
pub trait Pacer: Send + Sync {
    /// `attempt` is the zero based index of the attempt that just finished.
    fn delay_after(&self, attempt: usize) -> Duration;
}

/// Same pause after every attempt.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Pacer for FixedDelay {
    fn delay_after(&self, _attempt: usize) -> Duration {
        self.delay
    }
}

/// Suspends the current task for the pacer's delay.
pub async fn pause(pacer: &dyn Pacer, attempt: usize) {
    let delay = pacer.delay_after(attempt);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
