use crate::context::CheckContext;
use crate::error::{CheckError, RegistryError};
use attest_types::{Identifier, labels_for};
use std::fmt;
use std::time::Duration;

/// A check body or a per-check hook.
pub trait Runnable {
    fn run(&self, ctx: &mut CheckContext) -> Result<(), CheckError>;
}

impl<F> Runnable for F
where
    F: Fn(&mut CheckContext) -> Result<(), CheckError>,
{
    fn run(&self, ctx: &mut CheckContext) -> Result<(), CheckError> {
        self(ctx)
    }
}

/// Decides whether a check should be skipped. `Some(reason)` votes skip.
pub trait SkipPredicate {
    fn skip_reason(&self) -> Option<String>;
}

impl<F> SkipPredicate for F
where
    F: Fn() -> Option<String>,
{
    fn skip_reason(&self) -> Option<String> {
        self()
    }
}

/// How multiple skip predicates combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SkipMode {
    /// The first predicate voting skip skips the check.
    #[default]
    Any,
    /// Every predicate must vote skip.
    All,
}

/// One selectable verification unit. Built with [`CheckBuilder`].
pub struct Check {
    pub(crate) id: String,
    pub(crate) labels: Vec<String>,
    pub(crate) skip_predicates: Vec<Box<dyn SkipPredicate>>,
    pub(crate) skip_mode: SkipMode,
    pub(crate) body: Box<dyn Runnable>,
    pub(crate) before: Option<Box<dyn Runnable>>,
    pub(crate) after: Option<Box<dyn Runnable>>,
    pub(crate) timeout: Option<Duration>,
}

impl Check {
    pub fn builder(id: impl Into<String>) -> CheckBuilder {
        CheckBuilder::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn skip_mode(&self) -> SkipMode {
        self.skip_mode
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn ensure_label(&mut self, label: &str) {
        if !self.labels.iter().any(|l| l == label) {
            self.labels.push(label.to_string());
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("id", &self.id)
            .field("labels", &self.labels)
            .field("skip_predicates", &self.skip_predicates.len())
            .field("skip_mode", &self.skip_mode)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Fluent configuration for a [`Check`], validated by [`CheckBuilder::build`].
pub struct CheckBuilder {
    id: String,
    labels: Vec<String>,
    skip_predicates: Vec<Box<dyn SkipPredicate>>,
    skip_mode: SkipMode,
    body: Option<Box<dyn Runnable>>,
    before: Option<Box<dyn Runnable>>,
    after: Option<Box<dyn Runnable>>,
    timeout: Option<Duration>,
}

impl CheckBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: Vec::new(),
            skip_predicates: Vec::new(),
            skip_mode: SkipMode::Any,
            body: None,
            before: None,
            after: None,
            timeout: None,
        }
    }

    /// Start from a catalog identifier; labels are derived with [`labels_for`].
    pub fn from_identifier(identifier: &Identifier) -> Self {
        Self::new(identifier.id.clone()).labels(labels_for(identifier))
    }

    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn check_fn<F>(self, body: F) -> Self
    where
        F: Fn(&mut CheckContext) -> Result<(), CheckError> + 'static,
    {
        self.runnable(body)
    }

    /// Same as [`CheckBuilder::check_fn`] for any [`Runnable`] implementation.
    pub fn runnable(mut self, body: impl Runnable + 'static) -> Self {
        self.body = Some(Box::new(body));
        self
    }

    /// Runs right before the body, only when the check is not skipped.
    pub fn before_check<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut CheckContext) -> Result<(), CheckError> + 'static,
    {
        self.before = Some(Box::new(hook));
        self
    }

    /// Runs right after a successful body, only when the check is not skipped.
    pub fn after_check<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut CheckContext) -> Result<(), CheckError> + 'static,
    {
        self.after = Some(Box::new(hook));
        self
    }

    pub fn skip_if(mut self, predicate: impl SkipPredicate + 'static) -> Self {
        self.skip_predicates.push(Box::new(predicate));
        self
    }

    pub fn skip_mode_any(mut self) -> Self {
        self.skip_mode = SkipMode::Any;
        self
    }

    pub fn skip_mode_all(mut self) -> Self {
        self.skip_mode = SkipMode::All;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Check, RegistryError> {
        if self.id.trim().is_empty() {
            return Err(RegistryError::EmptyCheckId);
        }
        let body = self
            .body
            .ok_or_else(|| RegistryError::MissingCheckFn { id: self.id.clone() })?;

        let mut check = Check {
            id: self.id,
            labels: Vec::new(),
            skip_predicates: self.skip_predicates,
            skip_mode: self.skip_mode,
            body,
            before: self.before,
            after: self.after,
            timeout: self.timeout,
        };
        for label in self.labels {
            check.ensure_label(&label);
        }
        let id = check.id.clone();
        check.ensure_label(&id);
        Ok(check)
    }
}
