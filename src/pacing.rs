use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Pause taken between consecutive search requests
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Sleeps for a uniformly random interval in `[min, max]`
#[derive(Debug, Clone)]
pub struct RandomDelay {
    min: Duration,
    max: Duration,
}

impl RandomDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        // inverted bounds collapse to `min`
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn next_delay(&self) -> Duration {
        if self.max == self.min {
            return self.min;
        }
        let secs = rand::thread_rng().gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

#[async_trait]
impl Pacer for RandomDelay {
    async fn pause(&self) {
        let delay = self.next_delay();
        debug!("Sleeping {:.2}s before next search", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }
}

/// No pause at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Pacer for NoDelay {
    async fn pause(&self) {}
}
