use thiserror::Error;

/// Errors returned by the containers of this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The key looked up by `op` is not in the container
    #[error("key not found by `{op}`")]
    NotFound { op: &'static str },
    /// Returned by the `_check_invariants` functions if internal structure is
    /// broken
    #[error("invariant violation: {0}")]
    InvariantViolation(&'static str),
}

impl Error {
    pub(crate) fn not_found(op: &'static str) -> Self {
        Error::NotFound { op }
    }
}
