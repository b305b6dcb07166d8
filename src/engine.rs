use std::mem;

use log::{debug, trace};

use crate::entry::{Entry, PathStyle};
use crate::error::WalkError;
use crate::filter::{Filter, MatchAll, MatchNone};
use crate::policy::ErrorPolicy;
use crate::provider::{Cursor, Disposition, Namespace};

// ---------------------------------------------------------------------------
// Ranger
// ---------------------------------------------------------------------------

/// The traversal engine: a filtered, policy-driven, lazy walk of one
/// namespace from one root.
///
/// A `Ranger` owns its namespace provider, four filters (include/exclude for
/// files, include/exclude for directories — defaults include everything,
/// exclude nothing) and the [`ErrorPolicy`] it was constructed with. Each
/// call to [`entries`](Ranger::entries) or one of the derived sequences
/// performs a brand-new walk from the root.
///
/// Starting a traversal borrows the `Ranger` mutably, so a second concurrent
/// traversal on the same instance, or reconfiguring filters mid-walk, is a
/// compile error rather than silent state corruption. Distinct instances are
/// fully independent.
///
/// # Example
///
/// ```
/// use ranger::{filter, HaltOnError, MemoryFs, Ranger};
///
/// let mut fs = MemoryFs::new();
/// fs.add_file("notes/todo.txt");
/// fs.add_file("notes/archive/old.txt");
/// fs.add_file("readme.md");
///
/// let mut ranger = Ranger::new(fs, ".", HaltOnError);
/// ranger.include(filter::match_extension([".txt"]));
///
/// let paths: Vec<String> = ranger.file_paths().collect();
/// assert_eq!(paths, ["notes/archive/old.txt", "notes/todo.txt"]);
/// assert!(!ranger.has_error());
/// ```
pub struct Ranger {
    ns: Box<dyn Namespace>,
    root: String,
    style: PathStyle,
    include_files: Box<dyn Filter>,
    exclude_files: Box<dyn Filter>,
    include_dirs: Box<dyn Filter>,
    exclude_dirs: Box<dyn Filter>,
    policy: Box<dyn ErrorPolicy>,
    last_err: Option<WalkError>,
}

impl Ranger {
    /// Create an engine over `ns`, rooted at `root`, with the given error
    /// policy. There is no default policy — every traversal error goes
    /// through the one supplied here (replaceable with
    /// [`set_error_policy`](Ranger::set_error_policy)).
    pub fn new(
        ns: impl Namespace + 'static,
        root: impl Into<String>,
        policy: impl ErrorPolicy + 'static,
    ) -> Self {
        let style = ns.path_style();
        Self {
            ns: Box::new(ns),
            root: root.into(),
            style,
            include_files: Box::new(MatchAll),
            exclude_files: Box::new(MatchNone),
            include_dirs: Box::new(MatchAll),
            exclude_dirs: Box::new(MatchNone),
            policy: Box::new(policy),
            last_err: None,
        }
    }

    /// The root this engine walks from.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The path syntax of the underlying namespace, propagated into every
    /// yielded [`Entry`].
    pub fn path_style(&self) -> PathStyle {
        self.style
    }

    // ── Configuration (between traversals) ────────────────────────────────

    /// Only include matching files when iterating.
    /// The default is to include all files.
    pub fn include(&mut self, f: impl Filter + 'static) {
        self.include_files = Box::new(f);
    }

    /// Exclude matching files when iterating.
    /// Exclusion takes precedence over inclusion.
    pub fn exclude(&mut self, f: impl Filter + 'static) {
        self.exclude_files = Box::new(f);
    }

    /// Only recurse into matching directories.
    /// The default is to include all directories.
    pub fn include_dir(&mut self, f: impl Filter + 'static) {
        self.include_dirs = Box::new(f);
    }

    /// Do not recurse into matching directories.
    /// Exclusion takes precedence over inclusion.
    pub fn exclude_dir(&mut self, f: impl Filter + 'static) {
        self.exclude_dirs = Box::new(f);
    }

    /// Replace the error policy for subsequent traversals.
    pub fn set_error_policy(&mut self, policy: impl ErrorPolicy + 'static) {
        self.policy = Box::new(policy);
    }

    // ── Error inspection ──────────────────────────────────────────────────

    /// The error seen at the most recently visited node, if that visit
    /// failed. Inspect after the sequence is exhausted or abandoned: after a
    /// policy halt this is the halting error; after a walk that recovered
    /// past errors and ended on successful visits it is `None`.
    pub fn last_error(&self) -> Option<&WalkError> {
        self.last_err.as_ref()
    }

    /// Whether the most recently visited node produced an error.
    pub fn has_error(&self) -> bool {
        self.last_err.is_some()
    }

    // ── Sequences ─────────────────────────────────────────────────────────

    /// Walk the namespace, yielding every matching entry — files and
    /// directories — in the provider's depth-first pre-order.
    ///
    /// The returned iterator is lazy and single-pass: the provider advances
    /// only when the next entry is requested, and dropping the iterator
    /// aborts the underlying walk. Use [`Entries::prune`] to skip the
    /// current directory's subtree mid-traversal.
    pub fn entries(&mut self) -> Entries<'_> {
        debug!("walking {} ({:?})", self.root, self.style);
        let cursor = self.ns.walk(&self.root);
        self.last_err = None;
        Entries {
            ranger: self,
            cursor,
            pending: Disposition::Continue,
            in_step: false,
            current_is_dir: false,
            finished: false,
        }
    }

    /// Paths of every matching entry, files and directories.
    pub fn paths(&mut self) -> impl Iterator<Item = String> + '_ {
        self.entries().map(Entry::into_path)
    }

    /// Matching file entries, ignoring directories.
    pub fn file_entries(&mut self) -> impl Iterator<Item = Entry> + '_ {
        self.entries().filter(|e| !e.is_dir())
    }

    /// Paths of matching files, ignoring directories.
    pub fn file_paths(&mut self) -> impl Iterator<Item = String> + '_ {
        self.file_entries().map(Entry::into_path)
    }

    /// Matching directory entries, ignoring files.
    pub fn dir_entries(&mut self) -> impl Iterator<Item = Entry> + '_ {
        self.entries().filter(Entry::is_dir)
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// The primary lazy sequence over a [`Ranger`]'s traversal.
///
/// Created by [`Ranger::entries`]. Besides `Iterator`, it exposes
/// [`prune`](Entries::prune) for skipping the current subtree, which is why
/// pruning callers hold the iterator in a variable instead of a `for` loop:
///
/// ```
/// use ranger::{HaltOnError, MemoryFs, Ranger};
///
/// let mut fs = MemoryFs::new();
/// fs.add_file("src/lib.rs");
/// fs.add_file("target/debug/out.bin");
///
/// let mut ranger = Ranger::new(fs, ".", HaltOnError);
/// let mut entries = ranger.entries();
/// let mut seen = Vec::new();
/// while let Some(entry) = entries.next() {
///     if entry.is_dir() && entry.base() == "target" {
///         entries.prune();
///         continue;
///     }
///     seen.push(entry.into_path());
/// }
/// assert_eq!(seen, [".", "src", "src/lib.rs"]);
/// ```
pub struct Entries<'r> {
    ranger: &'r mut Ranger,
    cursor: Box<dyn Cursor>,
    // Disposition for the node most recently returned by the cursor,
    // delivered on the next advance.
    pending: Disposition,
    in_step: bool,
    current_is_dir: bool,
    finished: bool,
}

impl Entries<'_> {
    /// Skip recursing into the entry most recently yielded by this iterator.
    ///
    /// A no-op when that entry is not a container. The request applies to the
    /// current step only; it is consumed when the traversal advances.
    ///
    /// # Panics
    ///
    /// Panics when no entry is currently under consideration — before the
    /// first call to `next`, or after the sequence has ended. That is a usage
    /// bug in the calling code, not a traversal error.
    pub fn prune(&mut self) {
        assert!(
            self.in_step,
            "prune() called outside an active traversal step"
        );
        if self.current_is_dir {
            trace!("prune requested");
            self.pending = Disposition::SkipSubtree;
        }
    }

    fn halt(&mut self) {
        self.cursor.advance(Disposition::Abort);
        self.finished = true;
    }
}

impl Iterator for Entries<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        self.in_step = false;
        if self.finished {
            return None;
        }
        loop {
            let disposition = mem::take(&mut self.pending);
            let Some(node) = self.cursor.advance(disposition) else {
                self.finished = true;
                return None;
            };
            let entry = Entry::new(node.path, node.is_dir, self.ranger.style);

            // The slot tracks the most recent visit: set on failure, cleared
            // on success.
            match node.error {
                Some(err) => {
                    let keep_going = self.ranger.policy.on_error(&err, &entry);
                    self.ranger.last_err = Some(err);
                    if !keep_going {
                        debug!("error policy halted traversal at {:?}", entry.path());
                        self.halt();
                        return None;
                    }
                    continue;
                }
                None => self.ranger.last_err = None,
            }

            if entry.is_dir() {
                let excluded = self.ranger.exclude_dirs.matches(&entry)
                    || !self.ranger.include_dirs.matches(&entry);
                if excluded {
                    // The root is never pruned: its children are still
                    // visited even when a directory filter excludes it.
                    if entry.path() != self.ranger.root {
                        trace!("pruning {:?}", entry.path());
                        self.pending = Disposition::SkipSubtree;
                    }
                    continue;
                }
            } else if self.ranger.exclude_files.matches(&entry)
                || !self.ranger.include_files.matches(&entry)
            {
                continue;
            }

            self.in_step = true;
            self.current_is_dir = entry.is_dir();
            return Some(entry);
        }
    }
}

impl Drop for Entries<'_> {
    fn drop(&mut self) {
        // Abandoning the sequence early cancels the walk: no namespace I/O
        // happens after this.
        if !self.finished {
            self.cursor.advance(Disposition::Abort);
        }
    }
}
