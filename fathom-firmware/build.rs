//! Build script for fathom-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates rangefinder.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_params();
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

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Validate rangefinder.toml at compile time
fn validate_params() {
    println!("cargo:rerun-if-changed=rangefinder.toml");

    let params_path = Path::new("rangefinder.toml");

    if !params_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: rangefinder.toml not found!                              ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds rangefinder.toml as its default params.     ║\n\
            ║  Please create one in the fathom-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(params_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read rangefinder.toml                          ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Full TOML syntax check first, for readable errors
    let value: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in rangefinder.toml                  ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_layout(&value);

    // Then the firmware's own loader, which checks names and ranges
    if let Err(e) = fathom_core::config::parse_params(&content) {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: rangefinder.toml rejected by the parameter loader        ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&format!("{:?}", e))
        );
    }

    println!("cargo:warning=rangefinder.toml validated successfully");
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

/// Check sections and value types, naming the offending key
fn validate_layout(value: &toml::Value) {
    let mut errors = Vec::new();

    let Some(table) = value.as_table() else {
        return;
    };

    for (section, body) in table {
        if section != "rangefinder" {
            errors.push(format!("Unknown section [{}]", section));
            continue;
        }

        let Some(slots) = body.as_table() else {
            errors.push("[rangefinder] must contain [rangefinder.N] tables".to_string());
            continue;
        };

        for (slot, params) in slots {
            let valid_slot = slot
                .parse::<usize>()
                .is_ok_and(|n| (1..=fathom_core::config::MAX_RANGEFINDERS).contains(&n));
            if !valid_slot {
                errors.push(format!(
                    "[rangefinder.{}] slot must be 1-{}",
                    slot,
                    fathom_core::config::MAX_RANGEFINDERS
                ));
            }

            let Some(params) = params.as_table() else {
                errors.push(format!("[rangefinder.{}] must be a table", slot));
                continue;
            };

            for (key, param) in params {
                if fathom_core::config::find_param(key).is_none() {
                    errors.push(format!("[rangefinder.{}] unknown parameter '{}'", slot, key));
                }
                if !matches!(
                    param,
                    toml::Value::Integer(_) | toml::Value::Float(_) | toml::Value::Boolean(_)
                ) {
                    errors.push(format!(
                        "[rangefinder.{}] {} must be a number or boolean",
                        slot, key
                    ));
                }
            }
        }
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid parameters in rangefinder.toml                   ║\n\
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
