//! CLI output formatting.
//!
//! Human-readable lines by default, one JSON object per line with `--json`
//! for scripting, nothing but errors with `--quiet`.

use std::fmt::Display;
use std::sync::OnceLock;

use parking_lot::RwLock;
use serde_json::json;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Verbosity level (0 = normal, 1+ = increasingly verbose).
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    *config_cell().read()
}

fn regular_output_suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

fn emit_json_line(kind: &str, payload: serde_json::Value) {
    println!(
        "{}",
        json!({
            "type": kind,
            "payload": payload,
        })
    );
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    *config_cell().write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

#[must_use]
pub fn is_quiet() -> bool {
    read_config().quiet
}

#[must_use]
pub fn verbosity() -> u8 {
    read_config().verbose
}

/// Print the application header with name and version.
pub fn header(version: &str) {
    let config = read_config();
    if config.json {
        emit_json_line(
            "header",
            json!({
                "app": "knightwatch",
                "version": version,
            }),
        );
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("knightwatch {version}");
    println!();
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    let value = value.to_string();

    if config.json {
        emit_json_line(
            "field",
            json!({
                "label": label,
                "value": value,
            }),
        );
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  {label:<14} {value}");
}

pub fn success(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("success", json!({ "message": message }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  ✓ {message}");
}

/// Print an error line to stderr. Never suppressed.
pub fn error(message: &str) {
    if read_config().json {
        eprintln!(
            "{}",
            json!({
                "type": "error",
                "payload": { "message": message },
            })
        );
        return;
    }

    eprintln!("  × {message}");
}

pub fn section(title: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("section", json!({ "title": title }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!();
    println!("{title}");
}

/// Print multiple lines of content, each indented.
pub fn lines(content: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("lines", json!({ "content": content }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    for line in content.lines() {
        println!("  {line}");
    }
}

/// Emit a JSON value directly (for commands that need custom JSON output).
pub fn json_output(value: serde_json::Value) {
    println!("{value}");
}
