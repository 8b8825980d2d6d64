//! Fuzz target for TOML audit configuration parsing.

#![no_main]

use fa_config::{validate_audit_config, AuditConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(config) = AuditConfig::parse_toml(text) {
            // Rendering and reparsing what loaded must not panic.
            if let Ok(rendered) = config.to_toml_string() {
                let _ = AuditConfig::parse_toml(&rendered);
            }
            let _ = validate_audit_config(&config);
        }
    }
});
