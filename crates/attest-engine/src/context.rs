//! Per-check mutable state handed to check bodies and hooks.

use crate::error::CheckError;
use attest_types::ids::REASON_EMPTY_RESULT_LISTS;
use attest_types::{CheckState, ReportObject, ResultObjectsOut};
use std::fmt::Write as _;
use std::panic::Location;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

/// What a check body sees while it runs.
///
/// The state starts as `passed` and only moves through the `set_result*`
/// setters. `aborted` is terminal and `error` is never downgraded by
/// [`CheckContext::set_result`].
#[derive(Debug)]
pub struct CheckContext {
    id: String,
    group: String,
    state: CheckState,
    failure_reason: String,
    failure_location: String,
    skip_reason: String,
    details: String,
    logs: String,
    deadline: Option<Instant>,
    suite_aborted_by: Option<String>,
}

impl CheckContext {
    pub(crate) fn new(
        id: &str,
        group: &str,
        deadline: Option<Instant>,
        suite_aborted_by: Option<String>,
    ) -> Self {
        Self {
            id: id.to_string(),
            group: group.to_string(),
            state: CheckState::Passed,
            failure_reason: String::new(),
            failure_location: String::new(),
            skip_reason: String::new(),
            details: String::new(),
            logs: String::new(),
            deadline,
            suite_aborted_by,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    pub fn failure_reason(&self) -> &str {
        &self.failure_reason
    }

    pub fn skip_reason(&self) -> &str {
        &self.skip_reason
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    /// Captured output so far.
    pub fn logs(&self) -> &str {
        &self.logs
    }

    /// Point in time this check should finish by, if the run has a deadline.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before [`CheckContext::deadline`]. Zero once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Id of the failed check that triggered the soft abort, when one has.
    pub fn suite_aborted_by(&self) -> Option<&str> {
        self.suite_aborted_by.as_deref()
    }

    pub fn log_debug(&mut self, msg: impl AsRef<str>) {
        self.log(Level::Debug, msg.as_ref());
    }

    pub fn log_info(&mut self, msg: impl AsRef<str>) {
        self.log(Level::Info, msg.as_ref());
    }

    pub fn log_warn(&mut self, msg: impl AsRef<str>) {
        self.log(Level::Warn, msg.as_ref());
    }

    pub fn log_error(&mut self, msg: impl AsRef<str>) {
        self.log(Level::Error, msg.as_ref());
    }

    fn log(&mut self, level: Level, msg: &str) {
        match level {
            Level::Debug => tracing::debug!(check = %self.id, "{msg}"),
            Level::Info => tracing::info!(check = %self.id, "{msg}"),
            Level::Warn => tracing::warn!(check = %self.id, "{msg}"),
            Level::Error => tracing::error!(check = %self.id, "{msg}"),
        }
        let _ = writeln!(self.logs, "{} [{}] {}", level.as_str(), self.id, msg);
    }

    /// Record the inspected objects.
    ///
    /// Any non-compliant object fails the check and the serialized lists become
    /// its failure reason. Two empty lists skip the check.
    pub fn set_result(&mut self, compliant: Vec<ReportObject>, non_compliant: Vec<ReportObject>) {
        if self.state == CheckState::Aborted {
            return;
        }

        let out = ResultObjectsOut {
            compliant_objects_out: compliant,
            non_compliant_objects_out: non_compliant,
        };
        match out.to_json_string() {
            Ok(text) => self.details = text,
            Err(err) => {
                let id = self.id.clone();
                self.log_error(format!("failed to serialize result objects for check {id}: {err}"));
            }
        }

        if self.state == CheckState::Error {
            return;
        }

        if !out.non_compliant_objects_out.is_empty() {
            self.state = CheckState::Failed;
            self.failure_reason = self.details.clone();
        } else if out.compliant_objects_out.is_empty() {
            let id = self.id.clone();
            self.log_warn(format!(
                "check {id} marked as skipped as both compliant and non-compliant objects lists are empty"
            ));
            self.state = CheckState::Skipped;
            self.skip_reason = REASON_EMPTY_RESULT_LISTS.to_string();
        }
    }

    #[track_caller]
    pub fn set_result_failed(&mut self, reason: impl Into<String>) {
        if self.state == CheckState::Aborted {
            return;
        }
        self.state = CheckState::Failed;
        self.failure_reason = reason.into();
        self.failure_location = Location::caller().to_string();
    }

    pub fn set_result_skipped(&mut self, reason: impl Into<String>) {
        if self.state == CheckState::Aborted {
            return;
        }
        self.state = CheckState::Skipped;
        self.skip_reason = reason.into();
    }

    /// Mark the check as errored. A check already in `error` keeps its first reason.
    #[track_caller]
    pub fn set_result_error(&mut self, reason: impl Into<String>) {
        let location = Location::caller().to_string();
        self.mark_error(reason.into(), location);
    }

    pub(crate) fn mark_error(&mut self, reason: String, location: String) {
        match self.state {
            CheckState::Aborted => {}
            CheckState::Error => {
                let id = self.id.clone();
                self.log_warn(format!("check {id} result was already marked as error"));
            }
            _ => {
                self.state = CheckState::Error;
                self.failure_reason = reason;
                self.failure_location = location;
            }
        }
    }

    pub(crate) fn set_result_aborted(&mut self, reason: impl Into<String>) {
        self.state = CheckState::Aborted;
        self.failure_reason = reason.into();
    }

    /// Build the error a body returns to stop the whole run:
    /// `return Err(ctx.abort("cluster unreachable"));`
    pub fn abort(&mut self, reason: impl Into<String>) -> CheckError {
        let reason = reason.into();
        self.log_warn(format!("check was manually aborted, reason: {reason}"));
        CheckError::Aborted(reason)
    }

    pub(crate) fn into_parts(self) -> ContextParts {
        ContextParts {
            state: self.state,
            failure_reason: self.failure_reason,
            failure_location: self.failure_location,
            skip_reason: self.skip_reason,
            details: self.details,
            logs: self.logs,
        }
    }
}

pub(crate) struct ContextParts {
    pub state: CheckState,
    pub failure_reason: String,
    pub failure_location: String,
    pub skip_reason: String,
    pub details: String,
    pub logs: String,
}
