use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// Version of the claim document shape.
pub const CLAIM_FORMAT_VERSION: &str = "v0.5.0";

/// Outcome of one attempted check.
///
/// The serialized form is the lowercase state string consumed by report viewers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Passed,
    Failed,
    Skipped,
    Error,
    Aborted,
}

impl CheckState {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckState::Passed => "passed",
            CheckState::Failed => "failed",
            CheckState::Skipped => "skipped",
            CheckState::Error => "error",
            CheckState::Aborted => "aborted",
        }
    }

    /// Short console tag (`PASS`, `FAIL`, ...).
    pub fn tag(self) -> &'static str {
        match self {
            CheckState::Passed => "PASS",
            CheckState::Failed => "FAIL",
            CheckState::Skipped => "SKIP",
            CheckState::Error => "ERROR",
            CheckState::Aborted => "ABORT",
        }
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog identity of a check: id, owning suite and comma-joined tags.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Identifier {
    pub id: String,
    pub suite: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tags: String,
}

/// Catalog text copied into every result at reconciliation time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CatalogInfo {
    /// Link to the best practice document supporting this check.
    pub best_practice_reference: String,
    pub description: String,
    /// Exception process, if one is defined.
    pub exception_process: String,
    /// Steps required to fix a failing check.
    pub remediation: String,
}

/// Per-scenario mandatory/optional flags.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CategoryClassification {
    #[serde(rename = "Extended", default)]
    pub extended: String,
    #[serde(rename = "FarEdge", default)]
    pub far_edge: String,
    #[serde(rename = "NonTelco", default)]
    pub non_telco: String,
    #[serde(rename = "Telco", default)]
    pub telco: String,
}

impl CategoryClassification {
    /// Look up the flag for a scenario name (`Extended`, `FarEdge`, `NonTelco`, `Telco`).
    pub fn get(&self, scenario: &str) -> Option<&str> {
        let v = match scenario {
            crate::ids::SCENARIO_EXTENDED => &self.extended,
            crate::ids::SCENARIO_FAREDGE => &self.far_edge,
            crate::ids::SCENARIO_NON_TELCO => &self.non_telco,
            crate::ids::SCENARIO_TELCO => &self.telco,
            _ => return None,
        };
        Some(v.as_str())
    }
}

/// One reconciled check outcome as persisted in `claim.results`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResult {
    #[serde(default)]
    pub captured_test_output: String,
    pub catalog_info: CatalogInfo,
    pub category_classification: CategoryClassification,
    /// Serialized compliant/non-compliant object lists.
    #[serde(default)]
    pub check_details: String,
    /// Elapsed time in nanoseconds.
    pub duration: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub end_time: String,
    #[serde(default)]
    pub failure_line_content: String,
    #[serde(default)]
    pub failure_location: String,
    #[serde(default)]
    pub failure_reason: String,
    #[serde(default)]
    pub skip_reason: String,
    pub start_time: String,
    pub state: CheckState,
    #[serde(rename = "testID")]
    pub test_id: Identifier,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Versions {
    pub claim_format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k8s: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oc_client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocp: Option<String>,
    pub tool: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_git_commit: Option<String>,
}

/// The claim body.
///
/// Maps are ordered so that serialization is byte-stable for a given content.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    #[serde(default)]
    pub configurations: BTreeMap<String, JsonValue>,
    pub metadata: Metadata,
    #[serde(default)]
    pub nodes: BTreeMap<String, JsonValue>,
    #[serde(default)]
    pub raw_results: BTreeMap<String, JsonValue>,
    #[serde(default)]
    pub results: BTreeMap<String, ClaimResult>,
    pub versions: Versions,
}

/// Root wrapper: `{ "claim": { ... } }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClaimRoot {
    pub claim: Claim,
}
