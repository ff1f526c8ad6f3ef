/// Error returned by a check body or hook.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// The body could not complete (e.g. an API was unreachable).
    #[error("{0}")]
    Failed(String),

    /// The body requested a hard abort of the whole run.
    #[error("{0}")]
    Aborted(String),
}

impl CheckError {
    pub fn failed(msg: impl std::fmt::Display) -> Self {
        CheckError::Failed(msg.to_string())
    }

    pub fn message(&self) -> &str {
        match self {
            CheckError::Failed(m) | CheckError::Aborted(m) => m,
        }
    }
}

/// Construction-time errors. Any of these aborts the run before a check executes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("check id must not be empty")]
    EmptyCheckId,

    #[error("check {id} has no check function")]
    MissingCheckFn { id: String },

    #[error("group name must not be empty")]
    EmptyGroupName,

    #[error("duplicate check id {id} (group {group})")]
    DuplicateCheckId { id: String, group: String },

    #[error("duplicate group {name}")]
    DuplicateGroup { name: String },
}
