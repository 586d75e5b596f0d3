use thiserror::Error;

/// Failures of the persistence codec. Rejected interactions are not errors;
/// they are reported through the outcome enums.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("save blob is not valid JSON")]
    Malformed,
    #[error("save blob has no version field")]
    MissingVersion,
    #[error("unrecognized save version {0}")]
    UnknownVersion(u64),
}

pub type Result<T> = core::result::Result<T, SaveError>;
