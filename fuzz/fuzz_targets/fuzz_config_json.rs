//! Fuzz target for JSON audit configuration parsing.
//!
//! Parsing and validation must reject malformed input with an error, never a panic.

#![no_main]

use fa_config::{validate_audit_config, AuditConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(config) = AuditConfig::parse_json(text) {
            let _ = validate_audit_config(&config);
        }
    }
});
