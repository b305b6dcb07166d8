//! # ranger
//!
//! Lazy, filterable directory-tree traversal — generic, embeddable, pull-based.
//!
//! ranger turns a depth-first walk of a hierarchical namespace into a
//! demand-driven sequence of entries. It owns the traversal engine
//! ([`Ranger`]), the contracts ([`Namespace`], [`Filter`], [`ErrorPolicy`]),
//! and two namespace providers: the OS filesystem ([`OsFs`]) and an
//! in-memory tree for deterministic tests ([`MemoryFs`]). It does **not**
//! perform filesystem I/O of its own — providers do the walking; the engine
//! layers filtering, error policy, and pruning on top.
//!
//! # Quick Start
//!
//! ```rust
//! use ranger::{filter, HaltOnError, MemoryFs, Ranger};
//!
//! let mut fs = MemoryFs::new();
//! fs.add_file("notes/todo.txt");
//! fs.add_file("notes/archive/old.txt");
//! fs.add_file("readme.md");
//!
//! let mut ranger = Ranger::new(fs, ".", HaltOnError);
//! ranger.include(filter::match_extension([".txt"]));
//!
//! let paths: Vec<String> = ranger.file_paths().collect();
//! assert_eq!(paths, ["notes/archive/old.txt", "notes/todo.txt"]);
//! ```
//!
//! The sequence is lazy and single-pass: the namespace advances only when
//! the consumer asks for the next entry, stopping early aborts the walk, and
//! iterating again starts a brand-new walk from the root.
//!
//! # Filters
//!
//! Four slots — include/exclude for files, include/exclude for directories.
//! Excluding a directory prunes its whole subtree from the walk (except the
//! root, whose children are always visited). Any `Fn(&Entry) -> bool`
//! closure is a [`Filter`]; the [`filter`] module adds combinators and the
//! common constructors (extension, glob, regex, prefix, dot-file).
//!
//! # Error policies
//!
//! Traversal errors are never raised out of the iterator — each one is
//! routed to the [`ErrorPolicy`] the engine was built with, which decides
//! continue-or-halt per occurrence: [`IgnoreErrors`], [`HaltOnError`],
//! [`CollectErrors`], [`IgnorePermissionDenied`], or any closure.
//!
//! # Custom namespaces
//!
//! Implement [`Namespace`] to walk anything tree-shaped:
//!
//! ```rust
//! use ranger::{Cursor, Disposition, Entry, HaltOnError, Namespace, Node, PathStyle, Ranger};
//!
//! /// A flat listing presented as a namespace.
//! struct ListFs(Vec<&'static str>);
//!
//! impl Namespace for ListFs {
//!     fn path_style(&self) -> PathStyle {
//!         PathStyle::Virtual
//!     }
//!
//!     fn walk(&self, root: &str) -> Box<dyn Cursor> {
//!         let mut nodes = vec![Node { path: root.to_string(), is_dir: true, error: None }];
//!         nodes.extend(self.0.iter().map(|p| Node {
//!             path: p.to_string(),
//!             is_dir: false,
//!             error: None,
//!         }));
//!         Box::new(ListCursor { nodes, next: 0 })
//!     }
//! }
//!
//! struct ListCursor {
//!     nodes: Vec<Node>,
//!     next: usize,
//! }
//!
//! impl Cursor for ListCursor {
//!     fn advance(&mut self, disposition: Disposition) -> Option<Node> {
//!         if disposition == Disposition::Abort {
//!             self.next = self.nodes.len();
//!         }
//!         let node = self.nodes.get(self.next)?.clone();
//!         self.next += 1;
//!         Some(node)
//!     }
//! }
//!
//! let fs = ListFs(vec!["invoice_jan.txt", "invoice_feb.txt", "report.txt"]);
//! let mut ranger = Ranger::new(fs, ".", HaltOnError);
//! ranger.include(|e: &Entry| e.base().starts_with("invoice"));
//! assert_eq!(ranger.file_paths().count(), 2);
//! ```

#![forbid(unsafe_code)]

pub mod filter;
pub mod policy;

mod engine;
mod entry;
mod error;
mod memfs;
mod osfs;
mod provider;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use engine::{Entries, Ranger};
pub use entry::{Entry, PathStyle};
pub use error::WalkError;
pub use filter::Filter;
pub use memfs::MemoryFs;
pub use osfs::OsFs;
pub use policy::{
    CollectErrors, ErrorPolicy, HaltOnError, IgnoreErrors, IgnorePermissionDenied,
};
pub use provider::{Cursor, Disposition, Namespace, Node};
