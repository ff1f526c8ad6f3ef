use crate::io::write_claim;
use anyhow::Context;
use attest_engine::RunContext;
use attest_types::timefmt::format_metadata_time;
use attest_types::{CLAIM_FORMAT_VERSION, Catalog, Claim, ClaimRoot};
use camino::Utf8Path;
use serde_json::Value as JsonValue;
use time::OffsetDateTime;

/// Assembles a claim document around one run.
#[derive(Clone, Debug)]
pub struct ClaimBuilder {
    root: ClaimRoot,
}

impl ClaimBuilder {
    pub fn new(started_at: OffsetDateTime) -> Self {
        let mut root = ClaimRoot::default();
        root.claim.metadata.start_time = format_metadata_time(started_at);
        root.claim.versions.claim_format = CLAIM_FORMAT_VERSION.to_string();
        root.claim.versions.tool = env!("CARGO_PKG_VERSION").to_string();
        Self { root }
    }

    pub fn with_tool_commit(mut self, commit: impl Into<String>) -> Self {
        self.root.claim.versions.tool_git_commit = Some(commit.into());
        self
    }

    pub fn with_configuration(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.root.claim.configurations.insert(key.into(), value);
        self
    }

    pub fn with_node(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.root.claim.nodes.insert(key.into(), value);
        self
    }

    /// Store an external result map (e.g. a feature-validation suite) under `rawResults`.
    pub fn with_raw_result(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.root.claim.raw_results.insert(key.into(), value);
        self
    }

    /// Stamp the end time and reconcile the run's records into `results`.
    pub fn finish(mut self, run: &RunContext, catalog: &Catalog) -> ClaimRoot {
        self.root.claim.metadata.end_time = format_metadata_time(run.finished_at());
        self.root.claim.results = run.reconciled_results(catalog);
        self.root
    }

    /// [`finish`](Self::finish) and write the claim to `output`.
    pub fn build(
        self,
        run: &RunContext,
        catalog: &Catalog,
        output: &Utf8Path,
    ) -> anyhow::Result<ClaimRoot> {
        let root = self.finish(run, catalog);
        write_claim(output, &root)?;
        tracing::info!(path = %output, results = root.claim.results.len(), "claim file created");
        Ok(root)
    }
}

/// Write the JUnit projection of `claim` to `output`.
pub fn to_junit_xml(
    claim: &Claim,
    output: &Utf8Path,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> anyhow::Result<()> {
    let report = attest_render::project_junit(&claim.results, start, end);
    crate::io::write_text(output, &attest_render::render_junit(&report))
        .context("write junit xml")?;
    tracing::info!(path = %output, tests = report.tests, failures = report.failures, "junit file created");
    Ok(())
}
