//! Configuration for the index mirror.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Retry configuration for mirror writes.
///
/// The default performs no inline retries: a failed index write is deferred
/// to the outbox immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial delay between retries.
    #[serde(with = "humantime_serde", default = "default_initial_delay")]
    pub initial_delay: Duration,

    /// Maximum delay between retries.
    #[serde(with = "humantime_serde", default = "default_max_delay")]
    pub max_delay: Duration,

    /// Backoff multiplier.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

fn default_max_retries() -> u32 {
    0
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(100)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetryConfig {
    /// Returns the delay that follows `delay`.
    pub fn next_delay(&self, delay: Duration) -> Duration {
        std::cmp::min(
            Duration::from_secs_f64(delay.as_secs_f64() * self.backoff_multiplier),
            self.max_delay,
        )
    }
}

/// Index mirror configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Inline retry policy for each mirror event.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Maximum number of deferred events kept for replay.
    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,

    /// Interval of the background replay task. Zero disables it.
    #[serde(with = "humantime_serde", default = "default_replay_interval")]
    pub replay_interval: Duration,
}

fn default_outbox_capacity() -> usize {
    10_000
}

fn default_replay_interval() -> Duration {
    Duration::ZERO
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            outbox_capacity: default_outbox_capacity(),
            replay_interval: default_replay_interval(),
        }
    }
}

mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_best_effort() {
        let config = MirrorConfig::default();
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.replay_interval, Duration::ZERO);
        assert_eq!(config.outbox_capacity, 10_000);
    }

    #[test]
    fn test_backoff_is_capped() {
        let retry = RetryConfig::default();
        assert_eq!(
            retry.next_delay(Duration::from_millis(100)),
            Duration::from_millis(200)
        );
        assert_eq!(
            retry.next_delay(Duration::from_secs(4)),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_deserialize_humantime() {
        let config: MirrorConfig = serde_json::from_str(
            r#"{"retry": {"max_retries": 3, "initial_delay": "250ms"}, "replay_interval": "30s"}"#,
        )
        .unwrap();
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.initial_delay, Duration::from_millis(250));
        assert_eq!(config.retry.max_delay, Duration::from_secs(5));
        assert_eq!(config.replay_interval, Duration::from_secs(30));
        assert_eq!(config.outbox_capacity, 10_000);
    }
}
