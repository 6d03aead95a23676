use thiserror::Error;

/// Reasons a filter object cannot be compiled.
///
/// Every variant aborts the whole compilation; no partial SQL is produced.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum CompileError {
    #[error("invalid field name: {0}")]
    InvalidFieldName(String),

    #[error("invalid operator: {0}")]
    InvalidOperator(String),

    #[error("invalid use of $or operator: entry {0} must have exactly one field")]
    InvalidDisjunctionEntry(usize),

    #[error("invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("invalid table prefix: {0}")]
    InvalidPrefix(String),

    // Shape errors raised while classifying raw JSON
    #[error("filter must be a JSON object")]
    NotAnObject,

    #[error("invalid value for field: {0}")]
    InvalidFieldValue(String),

    #[error("invalid use of $or operator: expected an array of objects")]
    InvalidDisjunction,

    #[error("invalid pagination value for {0}")]
    InvalidPagination(String),

    #[error("invalid $sort: expected an object of field directions")]
    InvalidSort,
}
