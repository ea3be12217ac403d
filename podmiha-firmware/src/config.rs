//! Build-time device configuration
//!
//! `build.rs` parses and validates `device.toml` and generates
//! `DEVICE_CONFIG` from it.

use podmiha_core::config::{DeviceConfig, IndicatorConfig, InputConfig, LinkConfig};
use podmiha_core::indicator::{Color, Palette};

include!(concat!(env!("OUT_DIR"), "/device_config.rs"));
