//! Fuzz target for config parsing and resolution.
//!
//! Goal: parsing and resolving arbitrary `attest.toml` text **never panics**.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_toml
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data)
        && let Ok(cfg) = attest_settings::parse_config_toml(text)
    {
        let _ = attest_settings::resolve_config(cfg, attest_settings::Overrides::default());
    }
});
