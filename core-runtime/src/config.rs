//! # Engine Configuration Module
//!
//! Provides runtime configuration for the library view engine.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct an
//! `EngineConfig`. The builder validates eagerly so a misconfigured engine
//! fails at startup rather than on the first recompute.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::EngineConfig;
//!
//! let config = EngineConfig::builder()
//!     .event_buffer_size(256)
//!     .offload_threshold(5_000)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.offload_threshold, 5_000);
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::EngineConfig;
//!
//! let config = EngineConfig::builder()
//!     .event_buffer_size(0)
//!     .build()
//!     .expect("Should fail - zero sized event buffer");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use crate::logging::LoggingConfig;

/// Song count at or above which recomputes leave the engine task.
pub const DEFAULT_OFFLOAD_THRESHOLD: usize = 2_000;

/// Runtime configuration for the view engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Capacity of the broadcast channel used by the event bus
    pub event_buffer_size: usize,

    /// Libraries with at least this many songs are recomputed on the
    /// blocking thread pool instead of inline on the engine task.
    pub offload_threshold: usize,

    /// Logging setup applied by hosts that call `init_logging`
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            offload_threshold: DEFAULT_OFFLOAD_THRESHOLD,
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Creates a new builder for constructing an `EngineConfig`.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > 100_000 {
            return Err(Error::Config(
                "Event buffer size exceeds maximum of 100,000 events".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether a library of `song_count` songs should be recomputed on the
    /// blocking pool.
    pub fn should_offload(&self, song_count: usize) -> bool {
        song_count >= self.offload_threshold
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    event_buffer_size: Option<usize>,
    offload_threshold: Option<usize>,
    logging: Option<LoggingConfig>,
}

impl EngineConfigBuilder {
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    pub fn offload_threshold(mut self, songs: usize) -> Self {
        self.offload_threshold = Some(songs);
        self
    }

    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Builds the configuration, validating it first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a value is out of range.
    pub fn build(self) -> Result<EngineConfig> {
        let config = EngineConfig {
            event_buffer_size: self
                .event_buffer_size
                .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            offload_threshold: self.offload_threshold.unwrap_or(DEFAULT_OFFLOAD_THRESHOLD),
            logging: self.logging.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogFormat, LogLevel};

    #[test]
    fn test_builder_defaults() {
        let config = EngineConfig::builder().build().unwrap();
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
        assert_eq!(config.offload_threshold, DEFAULT_OFFLOAD_THRESHOLD);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_builder_overrides() {
        let config = EngineConfig::builder()
            .event_buffer_size(8)
            .offload_threshold(0)
            .logging(LoggingConfig::default().with_format(LogFormat::Compact))
            .build()
            .unwrap();

        assert_eq!(config.event_buffer_size, 8);
        assert_eq!(config.logging.format, LogFormat::Compact);
        // A zero threshold offloads every recompute
        assert!(config.should_offload(0));
    }

    #[test]
    fn test_validation_rejects_bad_buffer() {
        assert!(EngineConfig::builder().event_buffer_size(0).build().is_err());
        assert!(EngineConfig::builder()
            .event_buffer_size(1_000_000)
            .build()
            .is_err());
    }

    #[test]
    fn test_should_offload() {
        let config = EngineConfig::builder().offload_threshold(10).build().unwrap();
        assert!(!config.should_offload(9));
        assert!(config.should_offload(10));
    }
}
