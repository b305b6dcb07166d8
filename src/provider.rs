use crate::entry::PathStyle;
use crate::error::WalkError;

/// Per-node instruction from the engine back to a [`Cursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    /// Proceed normally to the next node in pre-order.
    #[default]
    Continue,
    /// Do not descend into the node returned by the previous advance.
    /// Only meaningful when that node was a container.
    SkipSubtree,
    /// Terminate the walk. The cursor returns `None` and must perform no
    /// further namespace I/O.
    Abort,
}

/// One visited node, as reported by a provider.
///
/// On an errored visit `path` is still populated on a best-effort basis and
/// `is_dir` is `false` when classification metadata could not be retrieved.
#[derive(Debug, Clone)]
pub struct Node {
    pub path: String,
    pub is_dir: bool,
    pub error: Option<WalkError>,
}

/// A hierarchical namespace that can be walked depth-first.
///
/// Implement this to traverse anything tree-shaped — the OS filesystem
/// ([`OsFs`](crate::OsFs)), an in-memory tree ([`MemoryFs`](crate::MemoryFs)),
/// an archive, a remote listing.
///
/// # Contract
///
/// `walk` starts a depth-first **pre-order** walk rooted at `root`: a
/// container is reported before its children, and the first node returned by
/// the cursor is the root itself, bearing the exact root path it was given.
/// Sibling order is the provider's natural enumeration order (both bundled
/// providers document name order, but the engine does not require it).
///
/// # Error handling
///
/// A failed visit (unreadable directory, broken entry) must be reported as a
/// [`Node`] with `error` set rather than panicking or silently skipping —
/// the engine routes it through the configured
/// [`ErrorPolicy`](crate::ErrorPolicy).
pub trait Namespace: Send {
    /// The path syntax of every node this namespace yields.
    fn path_style(&self) -> PathStyle;

    /// Begin a new walk rooted at `root`.
    ///
    /// A nonexistent root is reported through the cursor as a single errored
    /// node, not by failing here.
    fn walk(&self, root: &str) -> Box<dyn Cursor>;
}

/// The pull half of a walk: one node per call, disposition in return.
///
/// `advance(d)` applies `d` to the node returned by the *previous* call, then
/// produces the next node. The first call's disposition is
/// [`Disposition::Continue`] by construction. After returning `None`, or
/// after receiving [`Disposition::Abort`], every further call returns `None`
/// and performs no namespace I/O.
pub trait Cursor: Send {
    fn advance(&mut self, disposition: Disposition) -> Option<Node>;
}
