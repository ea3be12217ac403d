//! Build script for podmiha-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Parses and validates device.toml at compile time
//! - Emits the validated configuration as a `const` for the firmware

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use podmiha_core::config::{ConfigError, DeviceConfig};
use podmiha_core::indicator::Color;

fn main() {
    setup_linker();
    let config = load_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Parse and validate device.toml
fn load_config() -> DeviceConfig {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a device.toml configuration file.         ║\n\
            ║  Please create one in the podmiha-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: DeviceConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid device.toml                                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    if let Err(e) = config.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in device.toml                     ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            ║  • {:<62} ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            describe(e)
        );
    }

    println!("cargo:warning=device.toml validated successfully");
    config
}

fn describe(error: ConfigError) -> &'static str {
    match error {
        ConfigError::ZeroBaudRate => "[link] baud_rate must be non-zero",
        ConfigError::ZeroInterval => "periods and timeouts must be non-zero",
        ConfigError::TimeoutNotAboveSendPeriod => {
            "[link] timeout_ms must be greater than send_period_ms"
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn color_expr(color: Color) -> String {
    format!("Color::new({}, {}, {})", color.r, color.g, color.b)
}

/// Write `$OUT_DIR/device_config.rs`
fn generate_config(config: &DeviceConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let link = &config.link;
    let input = &config.input;
    let palette = &config.indicator.palette;

    let source = format!(
        "/// Configuration from device.toml\n\
         pub const DEVICE_CONFIG: DeviceConfig = DeviceConfig {{\n    \
             link: LinkConfig {{\n        \
                 baud_rate: {},\n        \
                 send_period_ms: {},\n        \
                 timeout_ms: {},\n        \
                 start_link_up: {},\n    \
             }},\n    \
             input: InputConfig {{\n        \
                 debounce_ms: {},\n        \
                 poll_interval_ms: {},\n    \
             }},\n    \
             indicator: IndicatorConfig {{\n        \
                 palette: Palette {{\n            \
                     camera_on_mic_on: {},\n            \
                     camera_on_mic_off: {},\n            \
                     camera_off_mic_on: {},\n            \
                     camera_off_mic_off: {},\n        \
                 }},\n    \
             }},\n\
         }};\n",
        link.baud_rate,
        link.send_period_ms,
        link.timeout_ms,
        link.start_link_up,
        input.debounce_ms,
        input.poll_interval_ms,
        color_expr(palette.camera_on_mic_on),
        color_expr(palette.camera_on_mic_off),
        color_expr(palette.camera_off_mic_on),
        color_expr(palette.camera_off_mic_off),
    );

    fs::write(out_dir.join("device_config.rs"), source).unwrap();
}
