use crate::claim::{CheckState, ClaimResult};
use std::collections::BTreeMap;

/// Outcome counts for one suite (check group).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SuiteCounts {
    pub suite: String,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub error: u32,
    pub aborted: u32,
}

impl SuiteCounts {
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, state: CheckState) {
        match state {
            CheckState::Passed => self.passed += 1,
            CheckState::Failed => self.failed += 1,
            CheckState::Skipped => self.skipped += 1,
            CheckState::Error => self.error += 1,
            CheckState::Aborted => self.aborted += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.passed + self.failed + self.skipped + self.error + self.aborted
    }
}

/// Per-suite counts in display order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub suites: Vec<SuiteCounts>,
}

impl RunSummary {
    /// Summarize stored results, one row per `testID.suite` in name order.
    pub fn from_results(results: &BTreeMap<String, ClaimResult>) -> Self {
        let mut by_suite: BTreeMap<&str, SuiteCounts> = BTreeMap::new();
        for result in results.values() {
            let suite = result.test_id.suite.as_str();
            by_suite
                .entry(suite)
                .or_insert_with(|| SuiteCounts::new(suite))
                .record(result.state);
        }
        Self {
            suites: by_suite.into_values().collect(),
        }
    }

    pub fn totals(&self) -> SuiteCounts {
        let mut total = SuiteCounts::new("total");
        for s in &self.suites {
            total.passed += s.passed;
            total.failed += s.failed;
            total.skipped += s.skipped;
            total.error += s.error;
            total.aborted += s.aborted;
        }
        total
    }
}
