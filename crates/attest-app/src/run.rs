//! The `run` use case: execute selected checks and write the artifacts.

use crate::claim::{ClaimBuilder, to_junit_xml};
use crate::io::{write_claim, write_text};
use anyhow::Context;
use attest_engine::{Registry, RunContext, run_selected, sanitize_claim};
use attest_settings::{AttestConfigV1, Overrides, ResolvedConfig};
use attest_types::{Catalog, ClaimRoot};
use camino::Utf8PathBuf;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use time::OffsetDateTime;

pub const CLAIM_FILE: &str = "claim.json";
pub const JUNIT_FILE: &str = "junit.xml";
pub const SUMMARY_FILE: &str = "summary.md";

/// Parse and resolve config text (empty is allowed, defaults apply).
pub fn load_config(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = if config_text.trim().is_empty() {
        AttestConfigV1::default()
    } else {
        attest_settings::parse_config_toml(config_text).context("parse config")?
    };
    attest_settings::resolve_config(cfg, overrides).context("resolve config")
}

#[derive(Clone, Debug)]
pub struct RunOutput {
    pub run: RunContext,
    pub claim: ClaimRoot,
    /// Files written, in write order.
    pub artifacts: Vec<Utf8PathBuf>,
    /// Result ids dropped by claim sanitization.
    pub sanitized: Vec<String>,
}

/// Run every check `config` selects and write the configured artifacts.
///
/// `raw_results` are copied verbatim into `claim.rawResults`.
pub fn run_suites(
    registry: &Registry,
    catalog: &Catalog,
    config: &ResolvedConfig,
    raw_results: BTreeMap<String, JsonValue>,
) -> anyhow::Result<RunOutput> {
    let started_at = OffsetDateTime::now_utc();
    tracing::info!(
        profile = %config.profile,
        filter = %config.label_filter,
        timeout_secs = config.timeout.as_secs(),
        "running checks"
    );

    let mut builder = ClaimBuilder::new(started_at);
    for (key, value) in raw_results {
        builder = builder.with_raw_result(key, value);
    }

    let run = run_selected(registry, &config.evaluator, &config.run_options());
    let dir = &config.output_dir;
    let claim_path = dir.join(CLAIM_FILE);
    let mut claim = builder.build(&run, catalog, &claim_path)?;
    let mut artifacts = vec![claim_path.clone()];

    let mut sanitized = Vec::new();
    if config.sanitize_claim {
        sanitized = sanitize_claim(&mut claim.claim, &config.evaluator);
        if !sanitized.is_empty() {
            write_claim(&claim_path, &claim)?;
        }
        tracing::info!(removed = sanitized.len(), "claim sanitized");
    }

    if config.junit {
        let path = dir.join(JUNIT_FILE);
        to_junit_xml(&claim.claim, &path, run.started_at(), run.finished_at())?;
        artifacts.push(path);
    }

    if config.summary {
        let path = dir.join(SUMMARY_FILE);
        let results = &claim.claim.results;
        let summary = run.summary_where(|id| results.contains_key(id));
        write_text(&path, &attest_render::render_summary(&summary, &claim.claim.results))?;
        artifacts.push(path);
    }

    let totals = run.summary().totals();
    tracing::info!(
        passed = totals.passed,
        failed = totals.failed,
        skipped = totals.skipped,
        error = totals.error,
        aborted = totals.aborted,
        "run finished"
    );

    Ok(RunOutput {
        run,
        claim,
        artifacts,
        sanitized,
    })
}
