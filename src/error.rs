use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrgError>;

/// Everything that can go wrong while loading or querying an org chart.
///
/// The configuration variants are fatal: a chart that fails validation is
/// never handed to the rest of the engine.
#[derive(Debug, Error)]
pub enum OrgError {
    #[error("duplicate unit id `{0}`")]
    DuplicateId(String),
    #[error("unit `{unit}` references unknown parent `{parent}`")]
    DanglingParent { unit: String, parent: String },
    #[error("unit `{unit}` has a parent but founders and the executive must not")]
    UnexpectedParent { unit: String },
    #[error("team `{unit}` has no parent")]
    MissingParent { unit: String },
    #[error("team `{unit}` cannot report to `{parent}`")]
    InvalidParent { unit: String, parent: String },
    #[error("parent chain of `{unit}` forms a cycle")]
    ParentCycle { unit: String },
    #[error("org chart has no executive unit")]
    MissingExecutive,
    #[error("org chart has more than one executive unit (`{first}`, `{second}`)")]
    MultipleExecutives { first: String, second: String },
    #[error("unknown unit `{0}`")]
    UnknownUnit(String),
    #[error("`{0}` is not a department")]
    NotADepartment(String),
    #[error("failed to parse org units: {0}")]
    Parse(#[from] serde_json::Error),
}

impl OrgError {
    /// True for errors caused by malformed unit data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            OrgError::DuplicateId(_)
                | OrgError::DanglingParent { .. }
                | OrgError::UnexpectedParent { .. }
                | OrgError::MissingParent { .. }
                | OrgError::InvalidParent { .. }
                | OrgError::ParentCycle { .. }
                | OrgError::MissingExecutive
                | OrgError::MultipleExecutives { .. }
                | OrgError::Parse(_)
        )
    }
}

/// Failures of a key-value backend. These never escape the state controller.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage contents are not valid json: {0}")]
    Json(#[from] serde_json::Error),
}
