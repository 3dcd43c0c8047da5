use thiserror::Error;

/// Failures surfaced by the record store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored time value that is neither `HH:MM[:SS]` nor the sentinel
    #[error("malformed time in `{field}`: {value:?}")]
    MalformedTime { field: &'static str, value: String },

    #[error("not found: {0}")]
    NotFound(String),
}
