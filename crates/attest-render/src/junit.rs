use crate::model::{JunitCase, JunitFailure, JunitReport, JunitSuite};
use attest_types::timefmt::{format_metadata_time, parse_result_time};
use attest_types::{CheckState, ClaimResult};
use std::collections::BTreeMap;
use std::fmt::Write;
use time::OffsetDateTime;

pub const SUITE_NAME: &str = "Compliance Check Suite";
const PACKAGE: &str = "attest";

/// Project reconciled results onto the JUnit model.
///
/// `start`/`end` bound the whole run and give the suite time and timestamp.
pub fn project_junit(
    results: &BTreeMap<String, ClaimResult>,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> JunitReport {
    let mut failures = 0;
    let mut disabled = 0;
    let mut errors = 0;
    let mut cases = Vec::with_capacity(results.len());

    for (id, result) in results {
        match result.state {
            CheckState::Failed => failures += 1,
            CheckState::Error | CheckState::Aborted => {
                failures += 1;
                errors += 1;
            }
            CheckState::Skipped => disabled += 1,
            CheckState::Passed => {}
        }
        cases.push(project_case(id, result));
    }

    JunitReport {
        tests: results.len(),
        failures,
        disabled,
        errors,
        time: seconds_between(start, end),
        suite: JunitSuite {
            name: SUITE_NAME.to_string(),
            package: PACKAGE.to_string(),
            timestamp: format_metadata_time(end),
            cases,
        },
    }
}

fn project_case(id: &str, result: &ClaimResult) -> JunitCase {
    let time = match (
        parse_result_time(&result.start_time),
        parse_result_time(&result.end_time),
    ) {
        (Some(start), Some(end)) => seconds_between(start, end),
        _ => result.duration.max(0) as f64 / 1e9,
    };

    let skipped = (result.state == CheckState::Skipped).then(|| result.skip_reason.clone());
    let failure = (result.state == CheckState::Failed).then(|| JunitFailure {
        message: result
            .failure_reason
            .lines()
            .next()
            .unwrap_or_default()
            .to_string(),
        text: if result.check_details.is_empty() {
            result.failure_reason.clone()
        } else {
            result.check_details.clone()
        },
    });

    JunitCase {
        name: id.to_string(),
        classname: SUITE_NAME.to_string(),
        status: result.state,
        time,
        skipped,
        failure,
    }
}

fn seconds_between(start: OffsetDateTime, end: OffsetDateTime) -> f64 {
    (end - start).as_seconds_f64().max(0.0)
}

/// Serialize the model as a JUnit XML document.
pub fn render_junit(report: &JunitReport) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        out,
        "<testsuites tests=\"{}\" failures=\"{}\" disabled=\"{}\" errors=\"{}\" time=\"{:.3}\">",
        report.tests, report.failures, report.disabled, report.errors, report.time
    );

    let suite = &report.suite;
    let _ = writeln!(
        out,
        "  <testsuite name=\"{}\" package=\"{}\" tests=\"{}\" disabled=\"{}\" skipped=\"{}\" errors=\"{}\" failures=\"{}\" time=\"{:.3}\" timestamp=\"{}\">",
        escape_xml(&suite.name),
        escape_xml(&suite.package),
        report.tests,
        report.disabled,
        report.disabled,
        report.errors,
        report.failures,
        report.time,
        escape_xml(&suite.timestamp)
    );

    for case in &suite.cases {
        let _ = write!(
            out,
            "    <testcase name=\"{}\" classname=\"{}\" status=\"{}\" time=\"{:.3}\"",
            escape_xml(&case.name),
            escape_xml(&case.classname),
            case.status,
            case.time
        );
        if case.skipped.is_none() && case.failure.is_none() {
            out.push_str("/>\n");
            continue;
        }
        out.push_str(">\n");
        if let Some(reason) = &case.skipped {
            let reason = escape_xml(reason);
            let _ = writeln!(out, "      <skipped message=\"{reason}\">{reason}</skipped>");
        }
        if let Some(failure) = &case.failure {
            let _ = writeln!(
                out,
                "      <failure message=\"{}\">{}</failure>",
                escape_xml(&failure.message),
                escape_xml(&failure.text)
            );
        }
        out.push_str("    </testcase>\n");
    }

    out.push_str("  </testsuite>\n");
    out.push_str("</testsuites>\n");
    out
}

pub fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            c => result.push(c),
        }
    }
    result
}
