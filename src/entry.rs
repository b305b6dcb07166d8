use std::path::MAIN_SEPARATOR;

/// Path syntax used by a namespace and every [`Entry`] it yields.
///
/// Fixed per [`Namespace`](crate::Namespace) — a `Ranger` built over the OS
/// filesystem manipulates paths with the platform separator, while one built
/// over a virtual namespace always uses `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    /// Platform-native separator (`\` on Windows, `/` elsewhere).
    Native,
    /// Slash-separated virtual paths, regardless of platform.
    Virtual,
}

impl PathStyle {
    /// The separator character for this style.
    pub fn separator(self) -> char {
        match self {
            PathStyle::Native => MAIN_SEPARATOR,
            PathStyle::Virtual => '/',
        }
    }
}

/// A single node visited during traversal.
///
/// Entries are yielded by value: each one is an owned snapshot, valid for as
/// long as the caller keeps it, independent of the traversal advancing.
///
/// The path helpers are pure functions of the path text and the namespace's
/// [`PathStyle`] — they never touch the filesystem and never fail, returning
/// lexically sensible results even for degenerate inputs like `"."` or `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    path: String,
    is_dir: bool,
    style: PathStyle,
}

impl Entry {
    /// Create an entry. Providers and the engine construct these; tests can
    /// too, which keeps filters independently testable.
    pub fn new(path: impl Into<String>, is_dir: bool, style: PathStyle) -> Self {
        Self {
            path: path.into(),
            is_dir,
            style,
        }
    }

    /// Full path of the entry, in the namespace's separator convention.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Consume the entry, returning its path.
    pub fn into_path(self) -> String {
        self.path
    }

    /// Whether this entry is a container (directory) node.
    ///
    /// `false` when the provider had no classification metadata for the node,
    /// e.g. on an errored visit.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// The path syntax this entry was built with.
    pub fn path_style(&self) -> PathStyle {
        self.style
    }

    /// The directory of this entry.
    ///
    /// A container's directory is its own path, not the path one level up.
    /// For leaf entries this is the parent computation: everything before the
    /// last separator, or `"."` when there is none.
    pub fn dir(&self) -> &str {
        if self.is_dir {
            return &self.path;
        }
        parent_of(&self.path, self.style.separator())
    }

    /// The last element of the path, typically the file name.
    pub fn base(&self) -> &str {
        base_of(&self.path, self.style.separator())
    }

    /// The extension of the base name, including the leading dot.
    ///
    /// Empty when the base name has no dot. Case is preserved; callers
    /// wanting case-insensitive matching normalize themselves. The extension
    /// of a name like `.bashrc` is the whole name.
    pub fn ext(&self) -> &str {
        let base = self.base();
        match base.rfind('.') {
            Some(i) => &base[i..],
            None => "",
        }
    }

    /// Split the path at the final separator, keeping the separator on the
    /// left half. A pure lexical split: unlike [`dir`](Entry::dir), it has no
    /// container special case.
    pub fn split(&self) -> (&str, &str) {
        let sep = self.style.separator();
        match self.path.rfind(sep) {
            Some(i) => self.path.split_at(i + sep.len_utf8()),
            None => ("", &self.path),
        }
    }
}

fn base_of(path: &str, sep: char) -> &str {
    if path.is_empty() {
        return ".";
    }
    let trimmed = path.trim_end_matches(sep);
    if trimmed.is_empty() {
        // Nothing but separators.
        return &path[..sep.len_utf8()];
    }
    match trimmed.rfind(sep) {
        Some(i) => &trimmed[i + sep.len_utf8()..],
        None => trimmed,
    }
}

fn parent_of(path: &str, sep: char) -> &str {
    if path.is_empty() {
        return ".";
    }
    let trimmed = path.trim_end_matches(sep);
    if trimmed.is_empty() {
        return &path[..sep.len_utf8()];
    }
    match trimmed.rfind(sep) {
        None => ".",
        Some(i) => {
            let parent = trimmed[..i].trim_end_matches(sep);
            if parent.is_empty() {
                // Direct child of the separator root, e.g. "/file".
                &trimmed[..sep.len_utf8()]
            } else {
                parent
            }
        }
    }
}
