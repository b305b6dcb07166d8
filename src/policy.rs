//! Error policies: per-error continue-or-halt decisions.
//!
//! The engine has no opinion about traversal-time errors — every one is
//! routed through the [`ErrorPolicy`] the `Ranger` was built with, which
//! decides the fate of the walk one occurrence at a time.

use std::sync::{Arc, Mutex};

use crate::entry::Entry;
use crate::error::WalkError;

/// Decides whether traversal continues past an error.
///
/// Invoked exactly once per node whose visit failed, with the error and the
/// best-effort [`Entry`] for that node (path populated even when metadata
/// could not be retrieved). Never invoked for successful visits.
///
/// Returns `true` to swallow the error and continue, `false` to halt the
/// traversal immediately — the error stays retrievable via
/// [`Ranger::last_error`](crate::Ranger::last_error).
///
/// Any `FnMut(&WalkError, &Entry) -> bool` is an `ErrorPolicy`, so one-off
/// policies can be closures:
///
/// ```
/// use ranger::{Entry, MemoryFs, Ranger, WalkError};
///
/// let fs = MemoryFs::new();
/// // Continue past everything under "vendor", halt elsewhere.
/// let _ranger = Ranger::new(fs, ".", |_err: &WalkError, entry: &Entry| {
///     entry.path().starts_with("vendor")
/// });
/// ```
pub trait ErrorPolicy: Send {
    fn on_error(&mut self, err: &WalkError, entry: &Entry) -> bool;
}

impl<F> ErrorPolicy for F
where
    F: FnMut(&WalkError, &Entry) -> bool + Send,
{
    fn on_error(&mut self, err: &WalkError, entry: &Entry) -> bool {
        self(err, entry)
    }
}

/// Continue past every error; errors are silently dropped.
pub struct IgnoreErrors;

impl ErrorPolicy for IgnoreErrors {
    fn on_error(&mut self, _err: &WalkError, _entry: &Entry) -> bool {
        true
    }
}

/// Halt on the first error.
pub struct HaltOnError;

impl ErrorPolicy for HaltOnError {
    fn on_error(&mut self, _err: &WalkError, _entry: &Entry) -> bool {
        false
    }
}

/// Collect every error into a caller-owned sink, in encounter order, and
/// continue.
///
/// The caller keeps a clone of the `Arc` and inspects it after traversal:
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use ranger::{CollectErrors, MemoryFs, Ranger};
///
/// let mut fs = MemoryFs::new();
/// fs.add_file("ok.txt");
///
/// let sink = Arc::new(Mutex::new(Vec::new()));
/// let mut ranger = Ranger::new(fs, ".", CollectErrors::new(sink.clone()));
/// let _ = ranger.file_paths().count();
/// assert!(sink.lock().unwrap().is_empty());
/// ```
pub struct CollectErrors {
    sink: Arc<Mutex<Vec<WalkError>>>,
}

impl CollectErrors {
    pub fn new(sink: Arc<Mutex<Vec<WalkError>>>) -> Self {
        Self { sink }
    }
}

impl ErrorPolicy for CollectErrors {
    fn on_error(&mut self, err: &WalkError, _entry: &Entry) -> bool {
        if let Ok(mut sink) = self.sink.lock() {
            sink.push(err.clone());
        }
        true
    }
}

/// Continue past access-denied errors, halt on anything else.
///
/// The common "skip directories I can't read, but stop on anything
/// unexpected" policy.
pub struct IgnorePermissionDenied;

impl ErrorPolicy for IgnorePermissionDenied {
    fn on_error(&mut self, err: &WalkError, _entry: &Entry) -> bool {
        err.is_permission_denied()
    }
}
