// src/sheets/error.rs

use thiserror::Error;

/// Why the host attribute could not take a new value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    #[error("host attribute is not available yet")]
    NotReady,
    #[error("host attribute is read-only")]
    ReadOnly,
    #[error("host rejected the value: {0}")]
    Rejected(String),
    #[error("host write panicked: {0}")]
    Panicked(String),
}

/// Why the host commit action did not run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    #[error("no commit action is configured")]
    NotConfigured,
    #[error("commit action cannot execute right now")]
    NotExecutable,
    #[error("commit action failed: {0}")]
    Failed(String),
    #[error("commit action panicked: {0}")]
    Panicked(String),
}

/// Contract violations reported by the sheet mutation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("sheet '{0}' not found")]
    SheetNotFound(String),
    #[error("{what} index {index} is out of range (length {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    #[error("invalid size '{0}': must be a positive number")]
    InvalidDimension(String),
    #[error("column '{0}' is read-only")]
    ReadOnlyColumn(String),
    #[error("the last remaining sheet cannot be deleted")]
    LastSheet,
    #[error("this workbook holds a single sheet; sheets cannot be added or removed")]
    SingleSheetLayout,
    #[error("permission denied: {0}")]
    PermissionDenied(&'static str),
}

pub type MutationResult<T> = Result<T, MutationError>;
