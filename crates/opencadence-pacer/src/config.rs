//! Pacer configuration and validation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::MILLIS_PER_SEC;
use crate::error::{PacerError, PacerResult};

/// Configuration for one paced output stream.
///
/// Rate and freshness are fixed for a controller's lifetime; together they
/// derive the hard queue capacity `floor(rate_hz * freshness_ms / 1000)`,
/// the number of items that can be pending without any of them exceeding
/// the consumer's staleness tolerance at the configured cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacerConfig {
    /// Target output frequency in Hz.
    pub rate_hz: u32,
    /// Maximum staleness the consumer tolerates, in milliseconds.
    pub freshness_ms: u32,
    /// Request elevated scheduling priority for the pacing thread.
    ///
    /// Best effort; denial (e.g. missing CAP_SYS_NICE) is logged, not fatal.
    pub elevate_priority: bool,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            rate_hz: 100,
            freshness_ms: 200,
            elevate_priority: false,
        }
    }
}

impl PacerConfig {
    /// Create a configuration with the given rate and freshness.
    #[must_use]
    pub fn new(rate_hz: u32, freshness_ms: u32) -> Self {
        Self {
            rate_hz,
            freshness_ms,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PacerError::InvalidConfig`] if either parameter is zero, if
    /// the derived queue capacity would be zero (every item would be
    /// instantly stale), or if the tick period truncates to zero
    /// milliseconds.
    pub fn validate(&self) -> PacerResult<()> {
        if self.rate_hz == 0 {
            return Err(PacerError::invalid_config("rate_hz must be greater than 0"));
        }
        if self.freshness_ms == 0 {
            return Err(PacerError::invalid_config(
                "freshness_ms must be greater than 0",
            ));
        }
        if self.rate_hz > MILLIS_PER_SEC {
            return Err(PacerError::invalid_config(
                "rate_hz above 1000 truncates the tick period to zero milliseconds",
            ));
        }
        if self.max_queue_size() == 0 {
            return Err(PacerError::invalid_config(
                "rate_hz * freshness_ms below 1000 derives a zero-capacity queue",
            ));
        }
        Ok(())
    }

    /// Hard queue capacity derived from rate and freshness.
    #[must_use]
    pub fn max_queue_size(&self) -> usize {
        (u64::from(self.rate_hz) * u64::from(self.freshness_ms) / u64::from(MILLIS_PER_SEC))
            as usize
    }

    /// Tick period in whole milliseconds (`1000 / rate_hz`, truncated).
    #[must_use]
    pub fn period_ms(&self) -> u64 {
        u64::from(MILLIS_PER_SEC / self.rate_hz.max(1))
    }

    /// Tick period as a [`Duration`].
    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms())
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> PacerConfigBuilder {
        PacerConfigBuilder::default()
    }
}

/// Builder for [`PacerConfig`].
#[derive(Debug, Default)]
pub struct PacerConfigBuilder {
    config: PacerConfig,
}

impl PacerConfigBuilder {
    /// Set the target output frequency in Hz.
    #[must_use]
    pub fn rate_hz(mut self, rate_hz: u32) -> Self {
        self.config.rate_hz = rate_hz;
        self
    }

    /// Set the staleness tolerance in milliseconds.
    #[must_use]
    pub fn freshness_ms(mut self, freshness_ms: u32) -> Self {
        self.config.freshness_ms = freshness_ms;
        self
    }

    /// Request elevated scheduling priority for the pacing thread.
    #[must_use]
    pub fn elevate_priority(mut self, enabled: bool) -> Self {
        self.config.elevate_priority = enabled;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> PacerResult<PacerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_derivation() {
        let config = PacerConfig::new(10, 400);
        assert_eq!(config.max_queue_size(), 4);
        assert_eq!(config.period_ms(), 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_capacity_floors() {
        // 3 Hz * 500 ms = 1500 item-ms -> floor(1.5) = 1
        let config = PacerConfig::new(3, 500);
        assert_eq!(config.max_queue_size(), 1);
    }

    #[test]
    fn test_zero_rate_rejected() {
        let config = PacerConfig::new(0, 400);
        assert_eq!(
            config.validate(),
            Err(PacerError::invalid_config("rate_hz must be greater than 0"))
        );
    }

    #[test]
    fn test_zero_freshness_rejected() {
        let config = PacerConfig::new(10, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        // 10 Hz * 99 ms = 990 < 1000 -> capacity 0
        let config = PacerConfig::new(10, 99);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sub_millisecond_period_rejected() {
        let config = PacerConfig::new(2_000, 400);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_period_truncates() {
        // 1000 / 3 = 333 ms, truncated like the rest of the mark domain.
        let config = PacerConfig::new(3, 2_000);
        assert_eq!(config.period_ms(), 333);
    }

    #[test]
    fn test_builder() {
        let config = PacerConfig::builder()
            .rate_hz(50)
            .freshness_ms(100)
            .elevate_priority(true)
            .build()
            .unwrap();

        assert_eq!(config.rate_hz, 50);
        assert_eq!(config.freshness_ms, 100);
        assert!(config.elevate_priority);
        assert_eq!(config.max_queue_size(), 5);
    }

    #[test]
    fn test_builder_rejects_invalid() {
        let result = PacerConfig::builder().rate_hz(0).freshness_ms(400).build();
        assert!(result.is_err());
    }
}
