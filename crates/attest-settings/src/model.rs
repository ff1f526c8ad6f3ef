use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `attest.toml` schema v1.
///
/// Every field is optional; unset fields fall back to the profile preset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AttestConfigV1 {
    /// Optional schema string for tooling (`attest.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `full` (default), `common` or `quick`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Label expression selecting the checks to run. `all` selects every tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_filter: Option<String>,

    /// Global run timeout: `90s`, `30m`, `24h`, `1h30m` or plain seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Annotate checks that run after the first failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_on_failure: Option<bool>,

    /// Directory receiving `claim.json` and the other artifacts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junit: Option<bool>,

    /// Re-filter the written claim with the label filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanitize_claim: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<bool>,
}
