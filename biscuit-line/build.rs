//! Build script for biscuit-line
//!
//! Validates line.toml at compile time so a broken embedded default never
//! reaches the runtime.

use std::fs;
use std::path::Path;

/// Belt length, mirrored from biscuit-core
const BELT_LEN: i64 = 6;

/// Capacity of the payload and mark strings
const MAX_MARK_LEN: usize = 16;

const KNOWN_KEYS: [&str; 5] = [
    "pulse_interval_ms",
    "settle_interval_ms",
    "stamper_slot",
    "raw_payload",
    "stamp_mark",
];

fn main() {
    validate_config();
}

/// Validate line.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=line.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("line.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read line.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Table = match toml::from_str(&config_content) {
        Ok(table) => table,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in line.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let errors = validate_line(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid line configuration                               ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check keys, ranges and string lengths
fn validate_line(config: &toml::Table) -> Vec<String> {
    let mut errors = Vec::new();

    for key in config.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            errors.push(format!("unknown key '{}'", key));
        }
    }

    for key in ["pulse_interval_ms", "settle_interval_ms"] {
        match config.get(key) {
            Some(toml::Value::Integer(ms)) if *ms <= 0 || *ms > i64::from(u32::MAX) => {
                errors.push(format!("{} must be 1-{}", key, u32::MAX));
            }
            Some(toml::Value::Integer(_)) | None => {}
            Some(_) => errors.push(format!("{} must be an integer", key)),
        }
    }

    match config.get("stamper_slot") {
        Some(toml::Value::Integer(slot)) if *slot < 0 || *slot >= BELT_LEN => {
            errors.push(format!("stamper_slot must be 0-{}", BELT_LEN - 1));
        }
        Some(toml::Value::Integer(_)) | None => {}
        Some(_) => errors.push("stamper_slot must be an integer".to_string()),
    }

    for key in ["raw_payload", "stamp_mark"] {
        match config.get(key) {
            Some(toml::Value::String(s)) if s.is_empty() || s.len() > MAX_MARK_LEN => {
                errors.push(format!("{} must be 1-{} bytes", key, MAX_MARK_LEN));
            }
            Some(toml::Value::String(_)) | None => {}
            Some(_) => errors.push(format!("{} must be a string", key)),
        }
    }

    errors
}
