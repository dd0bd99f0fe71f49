use anyhow::{Context, Result};
use store::Latency;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Artificial per-operation store latency, for demoing async behavior.
    pub latency: Latency,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let latency = match std::env::var("DEALDESK_LATENCY_MS") {
            Ok(raw) => {
                let millis: u64 = raw
                    .trim()
                    .parse()
                    .context("DEALDESK_LATENCY_MS must be an integer millisecond count")?;
                Latency::from_millis(millis)
            }
            Err(_) => Latency::NONE,
        };
        Ok(Self { latency })
    }
}
