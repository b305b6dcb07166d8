use walkdir::WalkDir;

use crate::entry::PathStyle;
use crate::error::WalkError;
use crate::provider::{Cursor, Disposition, Namespace, Node};

/// The operating-system filesystem as a [`Namespace`].
///
/// Walks with [`walkdir`], siblings in name order for deterministic output.
/// Paths use the platform separator ([`PathStyle::Native`]); the root node
/// bears the root path exactly as given.
pub struct OsFs;

impl Namespace for OsFs {
    fn path_style(&self) -> PathStyle {
        PathStyle::Native
    }

    fn walk(&self, root: &str) -> Box<dyn Cursor> {
        Box::new(OsCursor {
            root: root.to_string(),
            iter: Some(WalkDir::new(root).sort_by_file_name().into_iter()),
        })
    }
}

struct OsCursor {
    root: String,
    // None once exhausted or aborted.
    iter: Option<walkdir::IntoIter>,
}

impl Cursor for OsCursor {
    fn advance(&mut self, disposition: Disposition) -> Option<Node> {
        let iter = self.iter.as_mut()?;
        match disposition {
            Disposition::Abort => {
                self.iter = None;
                return None;
            }
            Disposition::SkipSubtree => iter.skip_current_dir(),
            Disposition::Continue => {}
        }
        match iter.next() {
            None => {
                self.iter = None;
                None
            }
            Some(Ok(dent)) => Some(Node {
                path: dent.path().to_string_lossy().into_owned(),
                is_dir: dent.file_type().is_dir(),
                error: None,
            }),
            Some(Err(err)) => {
                let path = err
                    .path()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_else(|| self.root.clone());
                Some(Node {
                    path: path.clone(),
                    is_dir: false,
                    error: Some(map_walkdir_error(path, err)),
                })
            }
        }
    }
}

fn map_walkdir_error(path: String, err: walkdir::Error) -> WalkError {
    if err.loop_ancestor().is_some() {
        return WalkError::Loop(path);
    }
    match err.into_io_error() {
        Some(io_err) => WalkError::io(path, io_err),
        None => WalkError::Provider(format!("walk failed at {path}")),
    }
}
