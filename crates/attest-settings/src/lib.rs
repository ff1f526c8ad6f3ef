//! Config parsing and profile/preset resolution.
//!
//! This crate is IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::AttestConfigV1;
pub use presets::{PROFILE_COMMON, PROFILE_FULL, PROFILE_QUICK, Preset, preset};
pub use resolve::{Overrides, ResolvedConfig, parse_duration};

/// Schema id accepted in the `schema` field.
pub const CONFIG_SCHEMA_V1: &str = "attest.config.v1";

/// Parse `attest.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<AttestConfigV1> {
    let cfg: AttestConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective run config (preset + file + overrides).
pub fn resolve_config(cfg: AttestConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
