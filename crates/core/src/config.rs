// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Tunables for the booking engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fraction of the paid amount returned on user cancellation
    #[serde(default = "default_refund_fraction")]
    pub refund_fraction: f64,
    /// Age beyond which an unpaid booking is reclaimed
    #[serde(with = "humantime_serde", default = "default_staleness_threshold")]
    pub staleness_threshold: Duration,
    /// How often the cleanup sweep runs
    #[serde(with = "humantime_serde", default = "default_cleanup_interval")]
    pub cleanup_interval: Duration,
    /// Resources per catalog page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_refund_fraction() -> f64 {
    1.0
}

fn default_staleness_threshold() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

fn default_cleanup_interval() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_page_size() -> usize {
    6
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refund_fraction: default_refund_fraction(),
            staleness_threshold: default_staleness_threshold(),
            cleanup_interval: default_cleanup_interval(),
            page_size: default_page_size(),
        }
    }
}

/// Error validating or loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("refund_fraction must be within 0.0..=1.0, got {0}")]
    RefundFractionOutOfRange(f64),
    #[error("{0} must be non-zero")]
    ZeroDuration(&'static str),
    #[error("page_size must be non-zero")]
    ZeroPageSize,
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl EngineConfig {
    /// Parse and validate a TOML configuration
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.refund_fraction) {
            return Err(ConfigError::RefundFractionOutOfRange(self.refund_fraction));
        }
        if self.staleness_threshold.is_zero() {
            return Err(ConfigError::ZeroDuration("staleness_threshold"));
        }
        if self.cleanup_interval.is_zero() {
            return Err(ConfigError::ZeroDuration("cleanup_interval"));
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }

    pub fn with_refund_fraction(mut self, fraction: f64) -> Self {
        self.refund_fraction = fraction;
        self
    }

    pub fn with_staleness_threshold(mut self, threshold: Duration) -> Self {
        self.staleness_threshold = threshold;
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
