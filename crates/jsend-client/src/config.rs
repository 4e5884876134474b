//! Configuration types for the JSend client

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::parser::ParseMode;

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    /// How response bodies are parsed
    pub parse_mode: ParseMode,

    /// Headers applied to every outgoing request
    pub headers: HashMap<String, String>,

    /// Timeout configurations
    pub timeouts: TimeoutConfig,

    /// Retry configurations
    pub retry: RetryConfig,
}

impl ClientConfig {
    /// Configuration for endpoints that do not reliably emit envelopes.
    pub fn naked() -> Self {
        Self {
            parse_mode: ParseMode::Naked,
            ..Self::default()
        }
    }
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Connection timeout
    #[serde(with = "duration_serde")]
    pub connect: Duration,

    /// Request timeout for individual round trips
    #[serde(with = "duration_serde")]
    pub request: Duration,
}

/// Retry configuration for transient transport failures
///
/// Parse errors are never retried; the retry loop only re-dispatches when
/// the transport itself failed in a retryable way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,

    /// Initial retry delay
    #[serde(with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum retry delay
    #[serde(with = "duration_serde")]
    pub max_delay: Duration,

    /// Exponential backoff multiplier
    pub backoff_multiplier: f64,

    /// Jitter factor (0.0 to 1.0)
    pub jitter: f64,

    /// Whether to enable exponential backoff
    pub exponential_backoff: bool,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            request: Duration::from_secs(30),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: 0.1,
            exponential_backoff: true,
        }
    }
}

impl RetryConfig {
    /// Calculate the delay for a given attempt number
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_millis(0);
        }

        let mut delay = self.initial_delay;

        if self.exponential_backoff && attempt > 1 {
            let multiplier = self.backoff_multiplier.powi((attempt - 1) as i32);
            delay = Duration::from_millis((delay.as_millis() as f64 * multiplier) as u64);
        }

        if delay > self.max_delay {
            delay = self.max_delay;
        }

        if self.jitter > 0.0 {
            let jitter_ms = (delay.as_millis() as f64 * self.jitter) as u64;
            let random_offset = rand::random::<f64>() * jitter_ms as f64;
            delay = Duration::from_millis(delay.as_millis() as u64 + random_offset as u64);
        }

        // Jitter must not push past the configured maximum.
        if delay > self.max_delay {
            delay = self.max_delay;
        }

        delay
    }

    /// Check if an attempt should be retried
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

// Helper module for Duration serialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
