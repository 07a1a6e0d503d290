use std::time::Duration;

use crate::error::DataError;
use crate::models::Session;

pub mod euronext_client;
pub mod yahoo_client;
pub use euronext_client::EuronextClient;
pub use yahoo_client::YahooClient;

/// Simple rate limiter for API requests
pub struct ApiRateLimiter {
    delay_ms: u64,
}

impl ApiRateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        let delay_ms = if requests_per_minute > 0 {
            60_000 / requests_per_minute as u64
        } else {
            0 // Unlimited
        };

        Self { delay_ms }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub async fn wait(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(self.delay()).await;
        }
    }
}

/// Source of end-of-day market data
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MarketDataProvider {
    /// Up to `count` most recent daily sessions, oldest first
    async fn daily_sessions(&self, symbol: &str, count: usize) -> Result<Vec<Session>, DataError>;

    /// Volume accumulated over the current session's intraday bars
    async fn intraday_volume(&self, symbol: &str) -> Result<Option<u64>, DataError>;
}
