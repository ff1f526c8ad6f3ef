use crate::check::{Check, CheckBuilder};
use crate::context::CheckContext;
use crate::error::CheckError;
use crate::group::ChecksGroup;
use crate::registry::Registry;
use attest_types::{Catalog, CatalogEntry, Identifier, ReportObject};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared, ordered trace of hook and body invocations.
#[derive(Clone, Default)]
pub struct Trace(Rc<RefCell<Vec<String>>>);

impl Trace {
    pub fn push(&self, event: impl Into<String>) {
        self.0.borrow_mut().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

pub fn compliant(ctx: &mut CheckContext) -> Result<(), CheckError> {
    ctx.log_info("all pods compliant");
    ctx.set_result(vec![ReportObject::new("ok", "Pod", true)], vec![]);
    Ok(())
}

pub fn non_compliant(ctx: &mut CheckContext) -> Result<(), CheckError> {
    ctx.set_result(
        vec![],
        vec![ReportObject::new("privileged container", "Container", false)],
    );
    Ok(())
}

pub fn passing(id: &str, labels: &[&str]) -> Check {
    CheckBuilder::new(id)
        .labels(labels.iter().copied())
        .check_fn(compliant)
        .build()
        .expect("build passing check")
}

pub fn failing(id: &str, labels: &[&str]) -> Check {
    CheckBuilder::new(id)
        .labels(labels.iter().copied())
        .check_fn(non_compliant)
        .build()
        .expect("build failing check")
}

/// Check whose body records `body:<id>` and passes.
pub fn traced(id: &str, labels: &[&str], trace: &Trace) -> CheckBuilder {
    let t = trace.clone();
    let name = id.to_string();
    CheckBuilder::new(id)
        .labels(labels.iter().copied())
        .check_fn(move |ctx| {
            t.push(format!("body:{name}"));
            compliant(ctx)
        })
}

pub fn group(name: &str, checks: Vec<Check>) -> ChecksGroup {
    let mut group = ChecksGroup::new(name);
    for check in checks {
        group.add(check).expect("add check");
    }
    group
}

pub fn registry(groups: Vec<ChecksGroup>) -> Registry {
    let mut registry = Registry::new();
    for g in groups {
        registry.add_group(g).expect("add group");
    }
    registry
}

/// Catalog with one entry per registered check, tagged `common`.
pub fn catalog_for(registry: &Registry) -> Catalog {
    let mut catalog = Catalog::new();
    for group in registry.groups() {
        for check in group.checks() {
            catalog.add(CatalogEntry {
                identifier: Identifier {
                    id: check.id().to_string(),
                    suite: group.name().to_string(),
                    tags: "common".to_string(),
                },
                description: format!("{} description", check.id()),
                remediation: "fix it".to_string(),
                ..CatalogEntry::default()
            });
        }
    }
    catalog
}
