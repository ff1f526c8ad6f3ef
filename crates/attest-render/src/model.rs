use attest_types::CheckState;

/// `<testsuites>`: run-level aggregates wrapping the single suite.
#[derive(Clone, Debug, PartialEq)]
pub struct JunitReport {
    pub tests: usize,
    /// `failed`, `error` and `aborted` results.
    pub failures: usize,
    /// `skipped` results.
    pub disabled: usize,
    /// The `error` and `aborted` subset of `failures`.
    pub errors: usize,
    /// Seconds between run start and end.
    pub time: f64,
    pub suite: JunitSuite,
}

#[derive(Clone, Debug, PartialEq)]
pub struct JunitSuite {
    pub name: String,
    pub package: String,
    pub timestamp: String,
    pub cases: Vec<JunitCase>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct JunitCase {
    pub name: String,
    pub classname: String,
    pub status: CheckState,
    pub time: f64,
    /// Skip reason, present only for `skipped`.
    pub skipped: Option<String>,
    /// Present only for `failed`.
    pub failure: Option<JunitFailure>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JunitFailure {
    pub message: String,
    pub text: String,
}
