use crate::check::{Check, Runnable, SkipMode};
use crate::context::CheckContext;
use crate::error::CheckError;
use crate::group::ChecksGroup;
use crate::registry::Registry;
use crate::run::{CheckRecord, RunContext, RunOptions};
use attest_labels::{Evaluator, ParseError};
use attest_types::CheckState;
use attest_types::ids::{REASON_GLOBAL_TIMEOUT, suite_aborted_reason};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::{Duration, Instant};
use time::OffsetDateTime;

/// Compile `filter` (after `all` expansion) and run every selected check.
///
/// A malformed filter aborts before any check runs.
pub fn run_checks(
    registry: &Registry,
    filter: &str,
    options: &RunOptions,
) -> Result<RunContext, ParseError> {
    let expanded = attest_labels::expand_filter(filter);
    let evaluator = attest_labels::compile(&expanded)?;
    Ok(run_selected(registry, &evaluator, options))
}

/// Run every check `filter` selects, group by group, in registration order.
pub fn run_selected(registry: &Registry, filter: &Evaluator, options: &RunOptions) -> RunContext {
    let started_at = OffsetDateTime::now_utc();
    let deadline = Instant::now().checked_add(options.timeout);

    tracing::info!(
        filter = filter.source(),
        timeout_secs = options.timeout.as_secs(),
        abort_on_failure = options.abort_on_failure,
        "running checks"
    );

    let mut runner = Runner {
        options,
        deadline,
        records: Vec::new(),
        groups: Vec::new(),
        abort_trigger: None,
        hard_abort: None,
        timed_out: false,
        errors: Vec::new(),
    };
    for group in registry.groups() {
        runner.run_group(group, filter);
    }

    let ctx = RunContext {
        filter: filter.source().to_string(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        records: runner.records,
        groups: runner.groups,
        abort_trigger: runner.abort_trigger,
        hard_abort: runner.hard_abort,
        timed_out: runner.timed_out,
        errors: runner.errors,
    };
    tracing::info!(
        attempted = ctx.records.len(),
        failed = ctx.failed_count(),
        errors = ctx.errors.len(),
        "run finished"
    );
    ctx
}

struct Runner<'a> {
    options: &'a RunOptions,
    deadline: Option<Instant>,
    records: Vec<CheckRecord>,
    groups: Vec<String>,
    abort_trigger: Option<String>,
    hard_abort: Option<String>,
    timed_out: bool,
    errors: Vec<String>,
}

/// Why a hook or body did not complete.
enum Failure {
    Returned(CheckError),
    Panicked(String),
}

impl Failure {
    /// `(failure type, detail)`, e.g. `("beforeEach function unexpected error", "boom")`.
    fn describe(&self, subject: &str) -> (String, String) {
        match self {
            Failure::Returned(err) => (
                format!("{subject} function unexpected error"),
                err.message().to_string(),
            ),
            Failure::Panicked(payload) => (format!("{subject} function panicked"), payload.clone()),
        }
    }
}

fn guarded(f: impl FnOnce() -> Result<(), CheckError>) -> Result<(), Failure> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(Failure::Returned(err)),
        Err(payload) => Err(Failure::Panicked(panic_message(payload.as_ref()))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl Runner<'_> {
    /// Reason every further check must be skipped with, if the run is stopping.
    fn stop_reason(&mut self) -> Option<String> {
        if let Some(reason) = &self.hard_abort {
            return Some(reason.clone());
        }
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d);
        if expired {
            if !self.timed_out {
                tracing::warn!("running all checks timed out");
                self.timed_out = true;
            }
            return Some(REASON_GLOBAL_TIMEOUT.to_string());
        }
        None
    }

    fn run_group(&mut self, group: &ChecksGroup, filter: &Evaluator) {
        let selected: Vec<&Check> = group
            .checks
            .iter()
            .filter(|c| {
                let hit = filter.eval(&c.labels);
                if !hit {
                    tracing::debug!(group = %group.name, check = %c.id, "not selected");
                }
                hit
            })
            .collect();
        if selected.is_empty() {
            tracing::debug!(group = %group.name, "no checks selected");
            return;
        }

        tracing::info!(
            group = %group.name,
            selected = selected.len(),
            total = group.checks.len(),
            "running group"
        );
        self.groups.push(group.name.clone());

        if let Some(reason) = self.stop_reason() {
            tracing::warn!(group = %group.name, reason = %reason, "skipping group");
            for check in &selected {
                self.push_not_run(group, check, CheckState::Skipped, String::new(), &reason);
            }
            return;
        }

        let ids: Vec<String> = selected.iter().map(|c| c.id.clone()).collect();
        let mut group_failure: Option<String> = None;

        if let Some(hook) = &group.before_all {
            tracing::debug!(group = %group.name, "running beforeAll");
            if let Err(failure) = guarded(|| hook.run(&ids)) {
                let (kind, detail) = failure.describe("beforeAll");
                tracing::error!(group = %group.name, reason = %detail, "{kind}");
                let reason = format!("group {} {kind}", group.name);
                self.errors.push(reason.clone());

                if let Some((first, rest)) = selected.split_first() {
                    self.push_not_run(group, first, CheckState::Error, format!("{kind}: {detail}"), "");
                    for check in rest {
                        self.push_not_run(group, check, CheckState::Skipped, String::new(), &reason);
                    }
                }
                self.run_after_all(group, &ids);
                return;
            }
        }

        for check in &selected {
            if let Some(reason) = &group_failure {
                self.push_not_run(group, check, CheckState::Skipped, String::new(), reason);
                continue;
            }
            if let Some(reason) = self.stop_reason() {
                self.push_not_run(group, check, CheckState::Skipped, String::new(), &reason);
                continue;
            }
            group_failure = self.run_check(group, check);
        }

        self.run_after_all(group, &ids);
    }

    fn run_after_all(&mut self, group: &ChecksGroup, ids: &[String]) {
        let Some(hook) = &group.after_all else {
            return;
        };
        tracing::debug!(group = %group.name, "running afterAll");
        if let Err(failure) = guarded(|| hook.run(ids)) {
            let (kind, detail) = failure.describe("afterAll");
            tracing::error!(group = %group.name, reason = %detail, "{kind}");
            self.errors.push(format!("group {} {kind}", group.name));
            if let Some(last) = self.records.iter_mut().rev().find(|r| r.group == group.name) {
                last.mark_error(format!("{kind}: {detail}"));
            }
        }
    }

    /// Run one selected check. Returns the reason to skip the rest of the group
    /// when a group-level per-check hook failed.
    fn run_check(&mut self, group: &ChecksGroup, check: &Check) -> Option<String> {
        let now = Instant::now();
        let check_deadline = match (check.timeout.and_then(|t| now.checked_add(t)), self.deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        let mut ctx = CheckContext::new(
            &check.id,
            &group.name,
            check_deadline,
            self.abort_trigger.clone(),
        );
        let started_at = OffsetDateTime::now_utc();
        let mut group_failure = None;
        let mut executed = false;

        if let Some(hook) = &group.before_each {
            tracing::debug!(group = %group.name, check = %check.id, "running beforeEach");
            if let Err(failure) = guarded(|| hook.run(&mut ctx)) {
                group_failure = Some(self.group_hook_failed(group, &mut ctx, "beforeEach", &failure));
            }
        }

        if group_failure.is_none() {
            match should_skip(check, &mut ctx) {
                Some(reason) => {
                    let id = check.id.clone();
                    ctx.log_info(format!("skipping check {id}, reason: {reason}"));
                    ctx.set_result_skipped(reason);
                }
                None => {
                    executed = true;
                    self.execute(check, &mut ctx);
                }
            }
        }

        if let Some(hook) = &group.after_each {
            tracing::debug!(group = %group.name, check = %check.id, "running afterEach");
            if let Err(failure) = guarded(|| hook.run(&mut ctx)) {
                let reason = self.group_hook_failed(group, &mut ctx, "afterEach", &failure);
                group_failure.get_or_insert(reason);
            }
        }

        let duration = now.elapsed();
        if check_deadline.is_some_and(|d| Instant::now() > d) {
            ctx.log_warn(format!(
                "check exceeded its time budget ({} ms)",
                duration.as_millis()
            ));
        }

        let parts = ctx.into_parts();
        let mut record = CheckRecord {
            id: check.id.clone(),
            group: group.name.clone(),
            labels: check.labels.clone(),
            state: parts.state,
            failure_reason: parts.failure_reason,
            failure_location: parts.failure_location,
            skip_reason: parts.skip_reason,
            details: parts.details,
            captured_output: parts.logs,
            started_at,
            ended_at: OffsetDateTime::now_utc(),
            duration,
            executed,
        };
        self.apply_soft_abort(&mut record);

        tracing::info!(
            group = %record.group,
            check = %record.id,
            state = %record.state,
            duration_ms = record.duration.as_millis() as u64,
            "check finished"
        );
        self.records.push(record);
        group_failure
    }

    /// Run the per-check before hook, the body and the after hook.
    fn execute(&mut self, check: &Check, ctx: &mut CheckContext) {
        tracing::info!(check = %check.id, labels = ?check.labels, "running check");

        let stages: [(&str, Option<&dyn Runnable>); 3] = [
            ("beforeCheck", check.before.as_deref()),
            ("", Some(&*check.body)),
            ("afterCheck", check.after.as_deref()),
        ];
        for (stage, runnable) in stages {
            let Some(runnable) = runnable else {
                continue;
            };
            match guarded(|| runnable.run(ctx)) {
                Ok(()) => {}
                Err(Failure::Returned(CheckError::Aborted(reason))) => {
                    tracing::warn!(check = %check.id, reason = %reason, "check aborted the run");
                    ctx.set_result_aborted(reason.clone());
                    self.hard_abort = Some(reason);
                    return;
                }
                Err(failure) => {
                    let subject = if stage.is_empty() {
                        format!("check {}", check.id)
                    } else {
                        format!("check {} {stage}", check.id)
                    };
                    let (kind, detail) = failure.describe(&subject);
                    ctx.log_error(format!("{kind}: {detail}"));
                    ctx.mark_error(format!("{kind}: {detail}"), String::new());
                    return;
                }
            }
        }
    }

    fn group_hook_failed(
        &mut self,
        group: &ChecksGroup,
        ctx: &mut CheckContext,
        hook: &str,
        failure: &Failure,
    ) -> String {
        let (kind, detail) = failure.describe(hook);
        ctx.log_error(format!("{kind}: {detail}"));
        ctx.mark_error(format!("{kind}: {detail}"), String::new());
        let reason = format!("group {} {kind}", group.name);
        self.errors.push(reason.clone());
        reason
    }

    fn apply_soft_abort(&mut self, record: &mut CheckRecord) {
        if !self.options.abort_on_failure {
            return;
        }
        match &self.abort_trigger {
            Some(trigger) if record.executed => {
                record.failure_reason = suite_aborted_reason(trigger);
            }
            Some(_) => {}
            None if record.state == CheckState::Failed => {
                tracing::warn!(check = %record.id, "abort trigger set by failed check");
                self.abort_trigger = Some(record.id.clone());
            }
            None => {}
        }
    }

    fn push_not_run(
        &mut self,
        group: &ChecksGroup,
        check: &Check,
        state: CheckState,
        failure_reason: String,
        skip_reason: &str,
    ) {
        tracing::info!(
            group = %group.name,
            check = %check.id,
            state = %state,
            reason = if skip_reason.is_empty() { failure_reason.as_str() } else { skip_reason },
            "check not run"
        );
        let now = OffsetDateTime::now_utc();
        let level = if state == CheckState::Skipped { "INFO" } else { "ERROR" };
        let message = if skip_reason.is_empty() {
            format!("{level} [{}] {failure_reason}\n", check.id)
        } else {
            format!("{level} [{}] skipping check {}, reason: {skip_reason}\n", check.id, check.id)
        };
        self.records.push(CheckRecord {
            id: check.id.clone(),
            group: group.name.clone(),
            labels: check.labels.clone(),
            state,
            failure_reason,
            failure_location: String::new(),
            skip_reason: skip_reason.to_string(),
            details: String::new(),
            captured_output: message,
            started_at: now,
            ended_at: now,
            duration: Duration::ZERO,
            executed: false,
        });
    }
}

/// Evaluate skip predicates according to the check's skip mode.
fn should_skip(check: &Check, ctx: &mut CheckContext) -> Option<String> {
    let mut reasons = Vec::new();
    for (idx, predicate) in check.skip_predicates.iter().enumerate() {
        match catch_unwind(AssertUnwindSafe(|| predicate.skip_reason())) {
            Ok(Some(reason)) => {
                reasons.push(reason);
                if check.skip_mode == SkipMode::Any {
                    break;
                }
            }
            Ok(None) => {
                if check.skip_mode == SkipMode::All {
                    return None;
                }
            }
            Err(payload) => {
                let reason = format!(
                    "skip predicate (idx={idx}) panicked: {}",
                    panic_message(payload.as_ref())
                );
                ctx.log_error(&reason);
                return Some(reason);
            }
        }
    }

    if reasons.is_empty() {
        None
    } else {
        Some(reasons.join(", "))
    }
}
