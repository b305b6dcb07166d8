use std::io;
use std::sync::Arc;

use thiserror::Error;

/// An error reported by a namespace provider for one visited node.
///
/// `WalkError` is `Clone` so that the engine can keep the last-seen error
/// while a [`CollectErrors`](crate::CollectErrors) sink retains its own copy.
/// The io source is therefore held behind an `Arc`.
#[derive(Error, Debug, Clone)]
pub enum WalkError {
    // Traversal
    #[error("permission denied")]
    PermissionDenied(String),

    #[error("path not found")]
    NotFound(String),

    #[error("filesystem loop")]
    Loop(String),

    #[error("IO error")]
    Io {
        path: String,
        #[source]
        source: Arc<io::Error>,
    },

    // Third-party extensibility
    #[error("provider error")]
    Provider(String),
}

impl WalkError {
    /// Classify an io error for `path` into the matching variant.
    pub fn io(path: impl Into<String>, err: io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io {
                path,
                source: Arc::new(err),
            },
        }
    }

    /// The path this error occurred at, if applicable.
    /// Callers use this to present "skipped: <path>" without pattern matching on variants.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::PermissionDenied(p)
            | Self::NotFound(p)
            | Self::Loop(p)
            | Self::Io { path: p, .. } => Some(p),
            Self::Provider(_) => None,
        }
    }

    /// Whether this error is an access-denied condition.
    ///
    /// [`IgnorePermissionDenied`](crate::IgnorePermissionDenied) continues
    /// past exactly these errors and halts on everything else.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }

    /// Whether this error reports a missing path (e.g. a nonexistent root).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
