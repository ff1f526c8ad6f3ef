use crate::check::{Check, Runnable};
use crate::context::CheckContext;
use crate::error::{CheckError, RegistryError};
use std::fmt;

/// Hook run once around the selected checks of a group. Receives their ids.
pub trait GroupHook {
    fn run(&self, check_ids: &[String]) -> Result<(), CheckError>;
}

impl<F> GroupHook for F
where
    F: Fn(&[String]) -> Result<(), CheckError>,
{
    fn run(&self, check_ids: &[String]) -> Result<(), CheckError> {
        self(check_ids)
    }
}

/// Named, ordered sequence of checks sharing suite-level hooks.
pub struct ChecksGroup {
    pub(crate) name: String,
    pub(crate) checks: Vec<Check>,
    pub(crate) before_all: Option<Box<dyn GroupHook>>,
    pub(crate) after_all: Option<Box<dyn GroupHook>>,
    pub(crate) before_each: Option<Box<dyn Runnable>>,
    pub(crate) after_each: Option<Box<dyn Runnable>>,
}

impl ChecksGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checks: Vec::new(),
            before_all: None,
            after_all: None,
            before_each: None,
            after_each: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn before_all<F>(mut self, hook: F) -> Self
    where
        F: Fn(&[String]) -> Result<(), CheckError> + 'static,
    {
        self.before_all = Some(Box::new(hook));
        self
    }

    pub fn after_all<F>(mut self, hook: F) -> Self
    where
        F: Fn(&[String]) -> Result<(), CheckError> + 'static,
    {
        self.after_all = Some(Box::new(hook));
        self
    }

    /// Runs before every selected check, including ones later skipped by a predicate.
    pub fn before_each<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut CheckContext) -> Result<(), CheckError> + 'static,
    {
        self.before_each = Some(Box::new(hook));
        self
    }

    /// Runs after every selected check, whatever its outcome.
    pub fn after_each<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut CheckContext) -> Result<(), CheckError> + 'static,
    {
        self.after_each = Some(Box::new(hook));
        self
    }

    /// Append a check. The group name is added to its labels.
    pub fn add(&mut self, mut check: Check) -> Result<&mut Self, RegistryError> {
        if self.checks.iter().any(|c| c.id == check.id) {
            return Err(RegistryError::DuplicateCheckId {
                id: check.id,
                group: self.name.clone(),
            });
        }
        check.ensure_label(&self.name);
        self.checks.push(check);
        Ok(self)
    }

    /// Owned variant of [`ChecksGroup::add`] for builder chains.
    pub fn with_check(mut self, check: Check) -> Result<Self, RegistryError> {
        self.add(check)?;
        Ok(self)
    }
}

impl fmt::Debug for ChecksGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChecksGroup")
            .field("name", &self.name)
            .field("checks", &self.checks)
            .field("before_all", &self.before_all.is_some())
            .field("after_all", &self.after_all.is_some())
            .field("before_each", &self.before_each.is_some())
            .field("after_each", &self.after_each.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckBuilder;

    fn check(id: &str) -> Check {
        CheckBuilder::new(id)
            .check_fn(|_| Ok(()))
            .build()
            .expect("build")
    }

    #[test]
    fn add_keeps_order_and_labels_group() {
        let mut group = ChecksGroup::new("networking");
        group
            .add(check("networking-a"))
            .and_then(|g| g.add(check("networking-b")))
            .expect("add");

        let ids: Vec<&str> = group.checks().iter().map(Check::id).collect();
        assert_eq!(ids, vec!["networking-a", "networking-b"]);
        assert!(group.checks()[0].labels().iter().any(|l| l == "networking"));
    }

    #[test]
    fn duplicate_id_in_group_is_rejected() {
        let err = ChecksGroup::new("g")
            .with_check(check("g-a"))
            .and_then(|g| g.with_check(check("g-a")))
            .expect_err("duplicate");
        assert_eq!(
            err,
            RegistryError::DuplicateCheckId {
                id: "g-a".to_string(),
                group: "g".to_string()
            }
        );
    }
}
