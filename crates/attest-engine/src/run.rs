use attest_types::{CheckState, RunSummary, SuiteCounts};
use std::time::Duration;
use time::OffsetDateTime;

/// Knobs for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// Global budget measured from the start of the run.
    pub timeout: Duration,
    /// Annotate every check attempted after the first failure (soft abort).
    pub abort_on_failure: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(24 * 60 * 60),
            abort_on_failure: false,
        }
    }
}

/// Outcome of one selected check, in the order checks were attempted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckRecord {
    pub id: String,
    pub group: String,
    /// Labels the check was registered with, group name and id included.
    pub labels: Vec<String>,
    pub state: CheckState,
    pub failure_reason: String,
    pub failure_location: String,
    pub skip_reason: String,
    /// Serialized report objects (`checkDetails`).
    pub details: String,
    pub captured_output: String,
    pub started_at: OffsetDateTime,
    pub ended_at: OffsetDateTime,
    pub duration: Duration,
    /// The body (or one of its per-check hooks) was invoked.
    pub executed: bool,
}

impl CheckRecord {
    /// Force `error` unless the record is already `error` or `aborted`.
    pub(crate) fn mark_error(&mut self, reason: String) {
        if matches!(self.state, CheckState::Error | CheckState::Aborted) {
            return;
        }
        self.state = CheckState::Error;
        self.failure_reason = reason;
        self.skip_reason.clear();
    }
}

/// Everything a run produced. Owned by the caller once the engine returns.
#[derive(Clone, Debug)]
pub struct RunContext {
    pub(crate) filter: String,
    pub(crate) started_at: OffsetDateTime,
    pub(crate) finished_at: OffsetDateTime,
    pub(crate) records: Vec<CheckRecord>,
    pub(crate) groups: Vec<String>,
    pub(crate) abort_trigger: Option<String>,
    pub(crate) hard_abort: Option<String>,
    pub(crate) timed_out: bool,
    pub(crate) errors: Vec<String>,
}

impl RunContext {
    /// The (expanded) label filter the run selected with.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    pub fn finished_at(&self) -> OffsetDateTime {
        self.finished_at
    }

    pub fn records(&self) -> &[CheckRecord] {
        &self.records
    }

    pub fn record(&self, id: &str) -> Option<&CheckRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Id of the first failed check when `abort_on_failure` was set.
    pub fn abort_trigger(&self) -> Option<&str> {
        self.abort_trigger.as_deref()
    }

    /// Reason given by a check body that aborted the run.
    pub fn hard_abort_reason(&self) -> Option<&str> {
        self.hard_abort.as_deref()
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Group-level hook failures, e.g. `group platform beforeEach function unexpected error`.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn count(&self, state: CheckState) -> usize {
        self.records.iter().filter(|r| r.state == state).count()
    }

    pub fn failed_count(&self) -> usize {
        self.count(CheckState::Failed)
    }

    /// Per-group counts in registration order.
    pub fn summary(&self) -> RunSummary {
        let suites = self
            .groups
            .iter()
            .map(|g| {
                let mut counts = SuiteCounts::new(g.as_str());
                for r in self.records.iter().filter(|r| &r.group == g) {
                    counts.record(r.state);
                }
                counts
            })
            .collect();
        RunSummary { suites }
    }

    /// Like [`RunContext::summary`], counting only records whose id `keep`
    /// accepts. Groups left with no records are dropped.
    pub fn summary_where(&self, keep: impl Fn(&str) -> bool) -> RunSummary {
        let suites = self
            .groups
            .iter()
            .filter_map(|g| {
                let mut counts = SuiteCounts::new(g.as_str());
                let mut any = false;
                for r in self
                    .records
                    .iter()
                    .filter(|r| &r.group == g && keep(&r.id))
                {
                    counts.record(r.state);
                    any = true;
                }
                any.then_some(counts)
            })
            .collect();
        RunSummary { suites }
    }
}
