use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Injectable time source so tests can pin or step timestamps.
#[derive(Clone)]
pub struct Clock(Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>);

impl Clock {
    pub fn system() -> Self {
        Self(Arc::new(Utc::now))
    }

    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self(Arc::new(move || at))
    }

    pub fn from_fn(f: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.0)()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock").finish_non_exhaustive()
    }
}

/// Artificial per-operation latency. A testing affordance standing in for
/// network time, not a back-pressure mechanism; defaults to none.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Latency {
    per_op: Duration,
}

impl Latency {
    pub const NONE: Latency = Latency {
        per_op: Duration::ZERO,
    };

    pub fn from_millis(millis: u64) -> Self {
        Self {
            per_op: Duration::from_millis(millis),
        }
    }

    pub async fn pause(&self) {
        if !self.per_op.is_zero() {
            tokio::time::sleep(self.per_op).await;
        }
    }
}
