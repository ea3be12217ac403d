//! Device configuration types
//!
//! Defaults match the reference node: 9600 baud, a report every 500 ms,
//! link considered lost after 2 s of silence, 100 ms debounce.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::indicator::Palette;

/// Serial link timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkConfig {
    /// UART baud rate (8N1, no flow control)
    pub baud_rate: u32,
    /// Report period (ms)
    pub send_period_ms: u64,
    /// Silence after which the link is down (ms)
    pub timeout_ms: u64,
    /// Report the link up from boot until the first timeout elapses
    pub start_link_up: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            send_period_ms: 500,
            timeout_ms: 2000,
            start_link_up: false,
        }
    }
}

/// Button sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputConfig {
    /// Minimum time between accepted level changes (ms)
    pub debounce_ms: u64,
    /// Pin sampling interval (ms)
    pub poll_interval_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            poll_interval_ms: 5,
        }
    }
}

/// Status LED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IndicatorConfig {
    pub palette: Palette,
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceConfig {
    pub link: LinkConfig,
    pub input: InputConfig,
    pub indicator: IndicatorConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Baud rate is zero
    ZeroBaudRate,
    /// A period or timeout is zero
    ZeroInterval,
    /// Link timeout must be longer than the send period
    TimeoutNotAboveSendPeriod,
}

impl DeviceConfig {
    /// Check the configuration for values the firmware cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.link.baud_rate == 0 {
            return Err(ConfigError::ZeroBaudRate);
        }

        if self.link.send_period_ms == 0
            || self.link.timeout_ms == 0
            || self.input.poll_interval_ms == 0
        {
            return Err(ConfigError::ZeroInterval);
        }

        // The host answers each report, so a timeout at or below the send
        // period would flap the link between every frame
        if self.link.timeout_ms <= self.link.send_period_ms {
            return Err(ConfigError::TimeoutNotAboveSendPeriod);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = DeviceConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.link.baud_rate, 9600);
        assert_eq!(config.link.send_period_ms, 500);
        assert_eq!(config.link.timeout_ms, 2000);
        assert!(!config.link.start_link_up);
        assert_eq!(config.input.debounce_ms, 100);
    }

    #[test]
    fn test_zero_baud_rejected() {
        let mut config = DeviceConfig::default();
        config.link.baud_rate = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroBaudRate));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = DeviceConfig::default();
        config.input.poll_interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));

        let mut config = DeviceConfig::default();
        config.link.send_period_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));
    }

    #[test]
    fn test_timeout_must_exceed_period() {
        let mut config = DeviceConfig::default();
        config.link.timeout_ms = config.link.send_period_ms;
        assert_eq!(
            config.validate(),
            Err(ConfigError::TimeoutNotAboveSendPeriod)
        );
    }
}
