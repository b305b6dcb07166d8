//! Predicates over [`Entry`] values and their combinators.
//!
//! A [`Filter`] is a pure boolean function with no error channel, so the
//! constructors here never panic at match time: a malformed glob pattern
//! simply never matches. Regex filters take a pre-compiled
//! [`regex::Regex`] — an invalid expression is a programmer error and fails
//! loudly at the caller's `unwrap`, once, at construction.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use regex::Regex;

use crate::entry::Entry;

/// Determines whether an entry is selected.
///
/// Implement this for custom selection logic, or use a closure — any
/// `Fn(&Entry) -> bool` is a `Filter`.
///
/// # Thread Safety
///
/// `Send + Sync` are required so filters can be shared between `Ranger`
/// instances running on different threads.
pub trait Filter: Send + Sync {
    /// Returns `true` if this entry is selected by the filter.
    fn matches(&self, entry: &Entry) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&Entry) -> bool + Send + Sync,
{
    fn matches(&self, entry: &Entry) -> bool {
        self(entry)
    }
}

// ---------------------------------------------------------------------------
// Defaults and combinators
// ---------------------------------------------------------------------------

/// Matches every entry. The default include filter.
pub struct MatchAll;

impl Filter for MatchAll {
    fn matches(&self, _entry: &Entry) -> bool {
        true
    }
}

/// Matches no entry. The default exclude filter.
pub struct MatchNone;

impl Filter for MatchNone {
    fn matches(&self, _entry: &Entry) -> bool {
        false
    }
}

/// Conjunction of filters. See [`and`].
pub struct And(Vec<Box<dyn Filter>>);

impl Filter for And {
    fn matches(&self, entry: &Entry) -> bool {
        self.0.iter().all(|f| f.matches(entry))
    }
}

/// All filters must match; short-circuits on the first miss.
/// An empty list is vacuously true.
pub fn and(filters: Vec<Box<dyn Filter>>) -> And {
    And(filters)
}

/// Disjunction of filters. See [`or`].
pub struct Or(Vec<Box<dyn Filter>>);

impl Filter for Or {
    fn matches(&self, entry: &Entry) -> bool {
        self.0.iter().any(|f| f.matches(entry))
    }
}

/// Any filter may match; short-circuits on the first hit.
/// An empty list is vacuously false.
pub fn or(filters: Vec<Box<dyn Filter>>) -> Or {
    Or(filters)
}

/// Inversion of a filter. See [`not`].
pub struct Not<F>(F);

impl<F: Filter> Filter for Not<F> {
    fn matches(&self, entry: &Entry) -> bool {
        !self.0.matches(entry)
    }
}

/// Invert a filter.
pub fn not<F: Filter>(filter: F) -> Not<F> {
    Not(filter)
}

// ---------------------------------------------------------------------------
// Predicate constructors
// ---------------------------------------------------------------------------

/// Matches files with any of the given extensions. See [`match_extension`].
pub struct MatchExtension(Vec<String>);

impl Filter for MatchExtension {
    fn matches(&self, entry: &Entry) -> bool {
        if entry.is_dir() {
            return false;
        }
        let ext = entry.ext().to_ascii_lowercase();
        self.0.iter().any(|e| *e == ext)
    }
}

/// Match files by extension, case-insensitively.
///
/// Each extension is given in its conventional form with the leading dot,
/// e.g. `".txt"`; the set is lowercased once at construction. Directories
/// never match an extension filter.
pub fn match_extension<I, S>(extensions: I) -> MatchExtension
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    MatchExtension(
        extensions
            .into_iter()
            .map(|e| e.as_ref().to_ascii_lowercase())
            .collect(),
    )
}

/// Matches full paths against glob patterns. See [`match_glob`].
pub struct MatchGlob(GlobSet);

impl Filter for MatchGlob {
    fn matches(&self, entry: &Entry) -> bool {
        self.0.is_match(entry.path())
    }
}

/// Matches base names against glob patterns. See [`match_glob_name`].
pub struct MatchGlobName(GlobSet);

impl Filter for MatchGlobName {
    fn matches(&self, entry: &Entry) -> bool {
        self.0.is_match(entry.base())
    }
}

/// Match the full path against one or more shell glob patterns
/// (`*`, `?`, character classes). `*` does not cross a separator.
///
/// Filters have no error channel, so a malformed pattern is dropped at
/// construction and never matches rather than panicking.
pub fn match_glob<I, S>(patterns: I) -> MatchGlob
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    MatchGlob(glob_set(patterns))
}

/// Match the base name against one or more shell glob patterns.
///
/// Same pattern syntax and malformed-pattern behavior as [`match_glob`].
pub fn match_glob_name<I, S>(patterns: I) -> MatchGlobName
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    MatchGlobName(glob_set(patterns))
}

fn glob_set<I, S>(patterns: I) -> GlobSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        if let Ok(glob) = GlobBuilder::new(pattern.as_ref())
            .literal_separator(true)
            .build()
        {
            builder.add(glob);
        }
    }
    builder.build().unwrap_or_else(|_| GlobSet::empty())
}

/// Matches full paths against a regular expression. See [`match_regex`].
pub struct MatchRegex(Regex);

impl Filter for MatchRegex {
    fn matches(&self, entry: &Entry) -> bool {
        self.0.is_match(entry.path())
    }
}

/// Match the full path against a pre-compiled regular expression.
pub fn match_regex(re: Regex) -> MatchRegex {
    MatchRegex(re)
}

/// Matches paths starting with a prefix. See [`match_prefix`].
pub struct MatchPrefix(String);

impl Filter for MatchPrefix {
    fn matches(&self, entry: &Entry) -> bool {
        entry.path().starts_with(&self.0)
    }
}

/// Match entries whose **full path** starts with `prefix`.
///
/// This is deliberately full-path semantics; for base-name prefix matching
/// at any depth see [`DotFile`], or write a closure over
/// [`Entry::base`](crate::Entry::base).
pub fn match_prefix(prefix: impl Into<String>) -> MatchPrefix {
    MatchPrefix(prefix.into())
}

/// Matches dot files: entries whose **base name** begins with `.`.
///
/// Base-name semantics make this useful at any nesting depth. A base name of
/// exactly `"."` (the traversal root under a virtual namespace) does not
/// count as a dot file.
pub struct DotFile;

impl Filter for DotFile {
    fn matches(&self, entry: &Entry) -> bool {
        let base = entry.base();
        base.starts_with('.') && base != "."
    }
}
