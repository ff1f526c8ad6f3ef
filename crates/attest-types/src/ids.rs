//! Stable identifiers: selection tags, scenario names and well-known reasons.
//!
//! Tags are label tokens every catalog entry can carry. Scenario names key the
//! category classification of a check.

// Tags
pub const TAG_COMMON: &str = "common";
pub const TAG_EXTENDED: &str = "extended";
pub const TAG_FAREDGE: &str = "faredge";
pub const TAG_TELCO: &str = "telco";

/// Filter keyword that selects every tagged check.
pub const FILTER_ALL: &str = "all";

/// Tags `all` expands to, in expansion order.
pub const ALL_TAGS: &[&str] = &[TAG_COMMON, TAG_EXTENDED, TAG_FAREDGE, TAG_TELCO];

// Scenarios (category classification keys)
pub const SCENARIO_EXTENDED: &str = "Extended";
pub const SCENARIO_FAREDGE: &str = "FarEdge";
pub const SCENARIO_NON_TELCO: &str = "NonTelco";
pub const SCENARIO_TELCO: &str = "Telco";

// Classification values
pub const MANDATORY: &str = "Mandatory";
pub const OPTIONAL: &str = "Optional";

// Catalog defaults
pub const NO_DOCUMENTED_PROCESS: &str = "There is no documented exception process for this.";
pub const NO_REFERENCE_DOCUMENT: &str = "No Reference Document Specified";

// Reasons
pub const REASON_GLOBAL_TIMEOUT: &str = "global time-out";
pub const REASON_EMPTY_RESULT_LISTS: &str = "Compliant and non-compliant objects lists are empty.";

/// Reason recorded on every check attempted after the soft abort trigger fired.
pub fn suite_aborted_reason(trigger_check_id: &str) -> String {
    format!("suite aborted due to failure in test {trigger_check_id}")
}
