use std::collections::{BTreeMap, BTreeSet};
use std::io;

use crate::entry::PathStyle;
use crate::error::WalkError;
use crate::provider::{Cursor, Disposition, Namespace, Node};

/// An in-memory [`Namespace`] for deterministic tests.
///
/// Paths are relative, slash-separated ([`PathStyle::Virtual`]), with `"."`
/// as the whole-tree root — add `"dir1/file3.txt"` and walk from `"."`.
/// Ancestor directories are created implicitly. Siblings enumerate in name
/// order.
///
/// Visit failures can be injected with [`fail_dir`](MemoryFs::fail_dir),
/// which reproduces how a real walk surfaces an unreadable directory: the
/// directory's own visit succeeds, then reading its contents fails and its
/// children are never reached.
///
/// ```
/// use ranger::{HaltOnError, MemoryFs, Ranger};
///
/// let mut fs = MemoryFs::new();
/// fs.add_file("docs/guide.md");
/// fs.add_file("readme.md");
///
/// let mut ranger = Ranger::new(fs, ".", HaltOnError);
/// let paths: Vec<String> = ranger.file_paths().collect();
/// assert_eq!(paths, ["docs/guide.md", "readme.md"]);
/// ```
#[derive(Default)]
pub struct MemoryFs {
    files: BTreeSet<String>,
    dirs: BTreeSet<String>,
    fail: BTreeMap<String, io::ErrorKind>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating ancestor directories implicitly.
    pub fn add_file(&mut self, path: impl Into<String>) {
        let path = clean(path.into());
        self.add_ancestors(&path);
        self.files.insert(path);
    }

    /// Add a directory (useful for empty ones), creating ancestors implicitly.
    pub fn add_dir(&mut self, path: impl Into<String>) {
        let path = clean(path.into());
        self.add_ancestors(&path);
        self.dirs.insert(path);
    }

    /// Make reading the contents of `path` fail with `kind`.
    ///
    /// The directory itself is still visited; the error surfaces on the
    /// follow-up visit that would have enumerated its children.
    pub fn fail_dir(&mut self, path: impl Into<String>, kind: io::ErrorKind) {
        let path = clean(path.into());
        self.add_dir(path.clone());
        self.fail.insert(path, kind);
    }

    fn add_ancestors(&mut self, path: &str) {
        let mut rest = path;
        while let Some(i) = rest.rfind('/') {
            rest = &rest[..i];
            self.dirs.insert(rest.to_string());
        }
    }

    // Pre-order node list for a walk rooted at `root`.
    fn nodes_from(&self, root: &str) -> Vec<Node> {
        let mut children: BTreeMap<&str, Vec<(&str, bool)>> = BTreeMap::new();
        for dir in &self.dirs {
            children.entry(parent(dir)).or_default().push((dir, true));
        }
        for file in &self.files {
            children.entry(parent(file)).or_default().push((file, false));
        }
        for siblings in children.values_mut() {
            siblings.sort();
        }

        let mut nodes = Vec::new();
        if root == "." || self.dirs.contains(root) {
            self.emit_dir(root, &children, &mut nodes);
        } else if self.files.contains(root) {
            nodes.push(ok_node(root, false));
        } else {
            nodes.push(Node {
                path: root.to_string(),
                is_dir: false,
                error: Some(WalkError::NotFound(root.to_string())),
            });
        }
        nodes
    }

    fn emit_dir(
        &self,
        path: &str,
        children: &BTreeMap<&str, Vec<(&str, bool)>>,
        nodes: &mut Vec<Node>,
    ) {
        nodes.push(ok_node(path, true));
        if let Some(kind) = self.fail.get(path) {
            nodes.push(Node {
                path: path.to_string(),
                is_dir: false,
                error: Some(WalkError::io(path, io::Error::from(*kind))),
            });
            return;
        }
        for (child, is_dir) in children.get(path).map(Vec::as_slice).unwrap_or(&[]) {
            if *is_dir {
                self.emit_dir(child, children, nodes);
            } else {
                nodes.push(ok_node(child, false));
            }
        }
    }
}

impl Namespace for MemoryFs {
    fn path_style(&self) -> PathStyle {
        PathStyle::Virtual
    }

    fn walk(&self, root: &str) -> Box<dyn Cursor> {
        Box::new(MemCursor {
            nodes: self.nodes_from(root),
            next: 0,
            done: false,
        })
    }
}

fn clean(path: String) -> String {
    path.trim_matches('/').to_string()
}

fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[..i],
        None => ".",
    }
}

fn ok_node(path: &str, is_dir: bool) -> Node {
    Node {
        path: path.to_string(),
        is_dir,
        error: None,
    }
}

struct MemCursor {
    nodes: Vec<Node>,
    next: usize,
    done: bool,
}

impl Cursor for MemCursor {
    fn advance(&mut self, disposition: Disposition) -> Option<Node> {
        if self.done {
            return None;
        }
        match disposition {
            Disposition::Abort => {
                self.done = true;
                return None;
            }
            Disposition::SkipSubtree => {
                if self.next > 0 {
                    let skip = self.nodes[self.next - 1].path.clone();
                    while self
                        .nodes
                        .get(self.next)
                        .is_some_and(|n| n.path == skip || within(&skip, &n.path))
                    {
                        self.next += 1;
                    }
                }
            }
            Disposition::Continue => {}
        }
        match self.nodes.get(self.next) {
            Some(node) => {
                self.next += 1;
                Some(node.clone())
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

// Whether `path` lies strictly beneath the directory `dir`.
fn within(dir: &str, path: &str) -> bool {
    if dir == "." {
        return path != ".";
    }
    path.len() > dir.len() && path.starts_with(dir) && path[dir.len()..].starts_with('/')
}
