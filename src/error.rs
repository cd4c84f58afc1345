//! Error type shared by every component of the border agent.
//!
//! The first group of variants is the taxonomy reported back to the mesh
//! stack. The remaining variants describe failures of collaborators or of
//! the operating system; [`Error::normalized`] folds them into
//! [`Error::Failed`] before an outcome leaves the agent.

use std::io;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A dotted name did not contain enough labels.
    #[error("malformed name `{0}`")]
    Parse(String),

    #[error("not found")]
    NotFound,

    #[error("invalid arguments")]
    InvalidArgs,

    #[error("duplicated")]
    Duplicated,

    #[error("operation not supported")]
    Unsupported,

    /// An outstanding update did not complete before its deadline.
    #[error("timed out waiting for publication results")]
    Timeout,

    /// Catch-all for outcomes outside of this taxonomy.
    #[error("failed")]
    Failed,

    /// The multicast DNS publisher reported a backend specific failure.
    #[error("mdns publisher: {0}")]
    Mdns(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Maps this error onto the taxonomy understood by the mesh stack.
    ///
    /// Errors that already belong to the taxonomy are returned unchanged,
    /// anything else becomes [`Error::Failed`].
    pub fn normalized(self) -> Self {
        match self {
            Error::Mdns(_) | Error::Io(_) => Error::Failed,
            other => other,
        }
    }
}
