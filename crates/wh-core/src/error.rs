use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid part {what}: {reason}")]
    InvalidPart { what: &'static str, reason: String },

    #[error("Invalid designator '{0}'")]
    InvalidDesignator(String),

    #[error("Designator '{0}' is already in use")]
    DuplicateDesignator(String),

    #[error("Invalid connection key '{0}'")]
    InvalidConnectionKey(String),
}
