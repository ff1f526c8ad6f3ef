use attest_types::{CheckState, ClaimResult, RunSummary, SuiteCounts};
use std::collections::BTreeMap;
use std::fmt::Write;

const EMPTY_LOG: &str = "Empty log output";

/// Markdown run summary: a count table per suite, totals, then one log section
/// per check that failed, errored or was aborted.
pub fn render_summary(summary: &RunSummary, results: &BTreeMap<String, ClaimResult>) -> String {
    let mut out = String::new();
    out.push_str("# Attest run summary\n\n");

    if summary.suites.is_empty() {
        out.push_str("No checks were run.\n");
        return out;
    }

    out.push_str("| Suite | Passed | Failed | Skipped | Error | Aborted | Total |\n");
    out.push_str("|---|---:|---:|---:|---:|---:|---:|\n");
    for suite in &summary.suites {
        push_row(&mut out, &format!("`{}`", suite.suite), suite);
    }
    push_row(&mut out, "**total**", &summary.totals());

    let not_passed: Vec<(&String, &ClaimResult)> = results
        .iter()
        .filter(|(_, r)| {
            matches!(
                r.state,
                CheckState::Failed | CheckState::Error | CheckState::Aborted
            )
        })
        .collect();
    if not_passed.is_empty() {
        return out;
    }

    out.push_str("\n## Failed checks\n");
    for (id, result) in not_passed {
        let _ = write!(out, "\n### `{id}` ({})\n\n", result.state);
        if !result.failure_reason.is_empty() {
            let reason = result.failure_reason.lines().next().unwrap_or_default();
            let _ = writeln!(out, "- Reason: {reason}");
        }
        if !result.failure_location.is_empty() {
            let _ = writeln!(out, "- Location: `{}`", result.failure_location);
        }
        if !result.failure_reason.is_empty() || !result.failure_location.is_empty() {
            out.push('\n');
        }

        let output = result.captured_test_output.trim_end();
        if output.is_empty() {
            let _ = writeln!(out, "{EMPTY_LOG}");
        } else {
            let _ = writeln!(out, "```text\n{output}\n```");
        }
    }

    out
}

fn push_row(out: &mut String, label: &str, c: &SuiteCounts) {
    let _ = writeln!(
        out,
        "| {} | {} | {} | {} | {} | {} | {} |",
        label,
        c.passed,
        c.failed,
        c.skipped,
        c.error,
        c.aborted,
        c.total()
    );
}
