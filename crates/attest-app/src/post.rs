//! Use cases over a stored claim file.

use crate::claim::to_junit_xml;
use crate::io::{read_claim, write_claim};
use anyhow::Context;
use attest_types::RunSummary;
use attest_types::timefmt::parse_result_time;
use camino::Utf8Path;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SanitizeOutput {
    pub removed: Vec<String>,
    pub kept: usize,
}

/// Rewrite a claim, dropping results that no longer match `filter`.
///
/// `output` defaults to overwriting `claim_path`.
pub fn run_sanitize(
    claim_path: &Utf8Path,
    filter: &str,
    output: Option<&Utf8Path>,
) -> anyhow::Result<SanitizeOutput> {
    let expanded = attest_labels::expand_filter(filter);
    let evaluator = attest_labels::compile(&expanded)
        .with_context(|| format!("invalid label filter: {filter}"))?;

    let mut root = read_claim(claim_path)?;
    let removed = attest_engine::sanitize_claim(&mut root.claim, &evaluator);
    write_claim(output.unwrap_or(claim_path), &root)?;

    tracing::info!(removed = removed.len(), kept = root.claim.results.len(), "claim sanitized");
    Ok(SanitizeOutput {
        removed,
        kept: root.claim.results.len(),
    })
}

/// Project a stored claim to JUnit XML using its metadata start/end times.
pub fn run_junit(claim_path: &Utf8Path, output: &Utf8Path) -> anyhow::Result<()> {
    let root = read_claim(claim_path)?;
    let metadata = &root.claim.metadata;
    let start = parse_result_time(&metadata.start_time)
        .with_context(|| format!("invalid claim start time: {:?}", metadata.start_time))?;
    let end = parse_result_time(&metadata.end_time)
        .with_context(|| format!("invalid claim end time: {:?}", metadata.end_time))?;
    to_junit_xml(&root.claim, output, start, end)
}

/// Markdown summary of a stored claim.
pub fn run_summary(claim_path: &Utf8Path) -> anyhow::Result<String> {
    let root = read_claim(claim_path)?;
    let summary = RunSummary::from_results(&root.claim.results);
    Ok(attest_render::render_summary(&summary, &root.claim.results))
}
