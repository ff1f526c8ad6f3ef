use crate::check::Check;
use crate::error::RegistryError;
use crate::group::ChecksGroup;
use attest_labels::Evaluator;
use std::collections::BTreeMap;

/// All registered groups in load order.
///
/// Check ids are unique across the whole registry.
#[derive(Debug, Default)]
pub struct Registry {
    groups: Vec<ChecksGroup>,
    owners: BTreeMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(&mut self, group: ChecksGroup) -> Result<&mut Self, RegistryError> {
        if group.name.trim().is_empty() {
            return Err(RegistryError::EmptyGroupName);
        }
        if self.groups.iter().any(|g| g.name == group.name) {
            return Err(RegistryError::DuplicateGroup { name: group.name });
        }
        for check in &group.checks {
            if let Some(owner) = self.owners.get(&check.id) {
                return Err(RegistryError::DuplicateCheckId {
                    id: check.id.clone(),
                    group: owner.clone(),
                });
            }
        }

        for check in &group.checks {
            self.owners.insert(check.id.clone(), group.name.clone());
        }
        self.groups.push(group);
        Ok(self)
    }

    pub fn groups(&self) -> &[ChecksGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&ChecksGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Every check in registration order.
    pub fn checks(&self) -> impl Iterator<Item = &Check> {
        self.groups.iter().flat_map(|g| g.checks.iter())
    }

    pub fn check_count(&self) -> usize {
        self.owners.len()
    }

    /// Name of the group owning a check id.
    pub fn group_of(&self, check_id: &str) -> Option<&str> {
        self.owners.get(check_id).map(String::as_str)
    }

    /// Ids the filter selects, in registration order.
    pub fn filter_check_ids(&self, filter: &Evaluator) -> Vec<&str> {
        self.checks()
            .filter(|c| filter.eval(&c.labels))
            .map(Check::id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckBuilder;

    fn check(id: &str, labels: &[&str]) -> Check {
        CheckBuilder::new(id)
            .labels(labels.iter().copied())
            .check_fn(|_| Ok(()))
            .build()
            .expect("build")
    }

    fn registry() -> Registry {
        let mut reg = Registry::new();
        reg.add_group(
            ChecksGroup::new("suite-a")
                .with_check(check("suite-a-one", &["common"]))
                .and_then(|g| g.with_check(check("suite-a-two", &["extended"])))
                .expect("group a"),
        )
        .expect("add a");
        reg.add_group(
            ChecksGroup::new("suite-b")
                .with_check(check("suite-b-one", &["common", "telco"]))
                .expect("group b"),
        )
        .expect("add b");
        reg
    }

    #[test]
    fn duplicate_id_across_groups_names_first_owner() {
        let mut reg = registry();
        let err = reg
            .add_group(
                ChecksGroup::new("suite-c")
                    .with_check(check("suite-a-one", &[]))
                    .expect("group c"),
            )
            .expect_err("duplicate");
        assert_eq!(
            err,
            RegistryError::DuplicateCheckId {
                id: "suite-a-one".to_string(),
                group: "suite-a".to_string()
            }
        );
        assert_eq!(reg.groups().len(), 2);
    }

    #[test]
    fn rejects_blank_and_duplicate_group_names() {
        let mut reg = registry();
        assert_eq!(
            reg.add_group(ChecksGroup::new("")).expect_err("blank"),
            RegistryError::EmptyGroupName
        );
        assert_eq!(
            reg.add_group(ChecksGroup::new("suite-b")).expect_err("dup"),
            RegistryError::DuplicateGroup {
                name: "suite-b".to_string()
            }
        );
    }

    #[test]
    fn filter_check_ids_in_registration_order() {
        let reg = registry();
        let common = attest_labels::compile("common").expect("compile");
        assert_eq!(reg.filter_check_ids(&common), vec!["suite-a-one", "suite-b-one"]);

        let by_suite = attest_labels::compile("suite-a").expect("compile");
        assert_eq!(reg.filter_check_ids(&by_suite), vec!["suite-a-one", "suite-a-two"]);

        assert_eq!(reg.group_of("suite-b-one"), Some("suite-b"));
        assert_eq!(reg.check_count(), 3);
    }
}
