use std::fs;
use std::io;
use std::path::MAIN_SEPARATOR;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ranger::{
    filter, CollectErrors, Cursor, Disposition, Entry, HaltOnError, IgnoreErrors,
    IgnorePermissionDenied, MemoryFs, Namespace, Node, OsFs, PathStyle, Ranger, WalkError,
};
use regex::Regex;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// The in-memory fixture tree:
/// ```text
/// a.txt
/// dir1/file3.txt
/// dir1/file4.log
/// dir2/file5.txt
/// dir2/subdir/file6.go
/// file1.txt
/// file2.log
/// ```
fn test_fs() -> MemoryFs {
    let mut fs = MemoryFs::new();
    for path in [
        "a.txt",
        "dir1/file3.txt",
        "dir1/file4.log",
        "dir2/file5.txt",
        "dir2/subdir/file6.go",
        "file1.txt",
        "file2.log",
    ] {
        fs.add_file(path);
    }
    fs
}

/// The same tree written to a real temporary directory.
fn setup_os_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::create_dir(root.join("dir1")).unwrap();
    fs::create_dir_all(root.join("dir2").join("subdir")).unwrap();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("dir1").join("file3.txt"), "3").unwrap();
    fs::write(root.join("dir1").join("file4.log"), "4").unwrap();
    fs::write(root.join("dir2").join("file5.txt"), "5").unwrap();
    fs::write(root.join("dir2").join("subdir").join("file6.go"), "6").unwrap();
    fs::write(root.join("file1.txt"), "1").unwrap();
    fs::write(root.join("file2.log"), "2").unwrap();

    dir
}

/// Apply `setup` to a fresh ranger over both providers and assert the
/// file-path sequence. OS paths are rebased onto the root and normalized to
/// `/` so both runs share one expectation.
fn check(setup: impl Fn(&mut Ranger), want: &str) {
    let mut ranger = Ranger::new(test_fs(), ".", HaltOnError);
    setup(&mut ranger);
    let got = ranger.file_paths().collect::<Vec<_>>().join("; ");
    assert_eq!(got, want, "virtual namespace");

    let dir = setup_os_tree();
    let root = dir.path().to_string_lossy().into_owned();
    let mut ranger = Ranger::new(OsFs, root.clone(), HaltOnError);
    setup(&mut ranger);
    let prefix = format!("{root}{MAIN_SEPARATOR}");
    let got = ranger
        .file_paths()
        .map(|p| {
            let rel = p.strip_prefix(&prefix).unwrap_or(p.as_str());
            rel.replace(MAIN_SEPARATOR, "/")
        })
        .collect::<Vec<_>>()
        .join("; ");
    assert_eq!(got, want, "os namespace");
}

fn file_paths(ranger: &mut Ranger) -> String {
    ranger.file_paths().collect::<Vec<_>>().join("; ")
}

// ---------------------------------------------------------------------------
// Filtered traversal, both providers
// ---------------------------------------------------------------------------

#[test]
fn walks_all_files() {
    check(
        |_| {},
        "a.txt; dir1/file3.txt; dir1/file4.log; dir2/file5.txt; dir2/subdir/file6.go; file1.txt; file2.log",
    );
}

#[test]
fn includes_only_txt_files() {
    check(
        |r| r.include(filter::match_extension([".txt"])),
        "a.txt; dir1/file3.txt; dir2/file5.txt; file1.txt",
    );
}

#[test]
fn excludes_log_files() {
    check(
        |r| r.exclude(filter::match_extension([".log"])),
        "a.txt; dir1/file3.txt; dir2/file5.txt; dir2/subdir/file6.go; file1.txt",
    );
}

#[test]
fn include_dirs_limits_recursion() {
    // Only dir1 may be recursed into; files outside any filtered directory
    // (directly under the root) are untouched by directory filters.
    check(
        |r| r.include_dir(filter::match_regex(Regex::new("dir1").unwrap())),
        "a.txt; dir1/file3.txt; dir1/file4.log; file1.txt; file2.log",
    );
}

#[test]
fn exclude_dir_prunes_whole_subtree() {
    check(
        |r| r.exclude_dir(filter::match_regex(Regex::new("dir2").unwrap())),
        "a.txt; dir1/file3.txt; dir1/file4.log; file1.txt; file2.log",
    );
}

#[test]
fn includes_by_regex() {
    check(
        |r| r.include(filter::match_regex(Regex::new(r"\.(txt|go)$").unwrap())),
        "a.txt; dir1/file3.txt; dir2/file5.txt; dir2/subdir/file6.go; file1.txt",
    );
}

#[test]
fn excludes_go_files() {
    check(
        |r| r.exclude(filter::match_extension([".go"])),
        "a.txt; dir1/file3.txt; dir1/file4.log; dir2/file5.txt; file1.txt; file2.log",
    );
}

#[test]
fn include_not_is_equivalent_to_exclude() {
    check(
        |r| r.include(filter::not(filter::match_extension([".go"]))),
        "a.txt; dir1/file3.txt; dir1/file4.log; dir2/file5.txt; file1.txt; file2.log",
    );
}

#[test]
fn include_dirs_by_glob_name() {
    // subdir does not match dir*, so file6.go is unreachable.
    check(
        |r| r.include_dir(filter::match_glob_name(["dir*"])),
        "a.txt; dir1/file3.txt; dir1/file4.log; dir2/file5.txt; file1.txt; file2.log",
    );
}

#[test]
fn combines_file_and_dir_filters() {
    check(
        |r| {
            r.include(filter::match_extension([".log"]));
            r.include_dir(filter::match_glob_name(["dir*"]));
        },
        "dir1/file4.log; file2.log",
    );
}

// ---------------------------------------------------------------------------
// Dot files and the root special case
// ---------------------------------------------------------------------------

#[test]
fn excludes_dot_files_at_any_depth() {
    let mut fs = MemoryFs::new();
    fs.add_file(".env");
    fs.add_file(".git/config");
    fs.add_file("src/.cache/tmp");
    fs.add_file("src/main.rs");

    let mut ranger = Ranger::new(fs, ".", HaltOnError);
    ranger.exclude(filter::DotFile);
    ranger.exclude_dir(filter::DotFile);
    assert_eq!(file_paths(&mut ranger), "src/main.rs");
}

#[test]
fn excluding_root_still_visits_children() {
    let mut ranger = Ranger::new(test_fs(), ".", HaltOnError);
    ranger.exclude_dir(|e: &Entry| e.path() == ".");

    let all: Vec<String> = ranger.paths().collect();
    assert!(!all.contains(&".".to_string()), "root itself is not offered");
    assert!(all.contains(&"dir1".to_string()), "non-root dirs still are");
    assert_eq!(
        file_paths(&mut ranger),
        "a.txt; dir1/file3.txt; dir1/file4.log; dir2/file5.txt; dir2/subdir/file6.go; file1.txt; file2.log",
    );
}

// ---------------------------------------------------------------------------
// Derived sequences
// ---------------------------------------------------------------------------

#[test]
fn derived_sequences_project_the_walk() {
    let mut ranger = Ranger::new(test_fs(), ".", HaltOnError);

    let dirs: Vec<String> = ranger.dir_entries().map(Entry::into_path).collect();
    assert_eq!(dirs, [".", "dir1", "dir2", "dir2/subdir"]);

    // 4 directories + 7 files.
    assert_eq!(ranger.paths().count(), 11);
    assert_eq!(ranger.entries().count(), 11);
    assert_eq!(ranger.file_entries().count(), 7);
}

#[test]
fn entries_carry_the_namespace_path_style() {
    let mut ranger = Ranger::new(test_fs(), ".", HaltOnError);
    assert_eq!(ranger.path_style(), PathStyle::Virtual);
    assert!(ranger
        .entries()
        .all(|e| e.path_style() == PathStyle::Virtual));
}

#[test]
fn retained_entries_outlive_the_traversal() {
    let mut ranger = Ranger::new(test_fs(), ".", HaltOnError);
    let kept: Vec<Entry> = ranger.file_entries().collect();
    // The iterator is gone; the snapshots are still usable.
    assert_eq!(kept[1].path(), "dir1/file3.txt");
    assert_eq!(kept[1].dir(), "dir1");
    assert_eq!(kept[1].base(), "file3.txt");
}

#[test]
fn reconfigures_between_traversals() {
    let mut ranger = Ranger::new(test_fs(), ".", HaltOnError);

    ranger.include(filter::match_extension([".txt"]));
    assert_eq!(ranger.file_paths().count(), 4);

    // Each traversal is a brand-new walk honoring the current filters.
    ranger.include(filter::match_extension([".log"]));
    assert_eq!(
        file_paths(&mut ranger),
        "dir1/file4.log; file2.log"
    );
}

// ---------------------------------------------------------------------------
// Pruning
// ---------------------------------------------------------------------------

#[test]
fn prune_skips_current_subtree() {
    let mut ranger = Ranger::new(test_fs(), ".", HaltOnError);
    let mut entries = ranger.entries();
    let mut files = Vec::new();
    while let Some(entry) = entries.next() {
        if entry.is_dir() && entry.base() == "dir2" {
            entries.prune();
            continue;
        }
        if !entry.is_dir() {
            files.push(entry.into_path());
        }
    }
    drop(entries);
    assert_eq!(
        files.join("; "),
        "a.txt; dir1/file3.txt; dir1/file4.log; file1.txt; file2.log"
    );
}

#[test]
fn prune_does_not_leak_into_siblings() {
    let mut ranger = Ranger::new(test_fs(), ".", HaltOnError);
    let mut entries = ranger.entries();
    let mut files = Vec::new();
    while let Some(entry) = entries.next() {
        if entry.is_dir() && entry.base() == "dir1" {
            entries.prune();
            continue;
        }
        if !entry.is_dir() {
            files.push(entry.into_path());
        }
    }
    drop(entries);
    assert_eq!(
        files.join("; "),
        "a.txt; dir2/file5.txt; dir2/subdir/file6.go; file1.txt; file2.log"
    );
}

#[test]
fn prune_on_a_file_is_a_no_op() {
    let mut ranger = Ranger::new(test_fs(), ".", HaltOnError);
    let mut entries = ranger.entries();
    let mut files = 0;
    while let Some(entry) = entries.next() {
        if !entry.is_dir() {
            entries.prune();
            files += 1;
        }
    }
    drop(entries);
    assert_eq!(files, 7);
}

#[test]
#[should_panic(expected = "outside an active traversal step")]
fn prune_before_the_first_step_panics() {
    let mut ranger = Ranger::new(test_fs(), ".", HaltOnError);
    let mut entries = ranger.entries();
    entries.prune();
}

#[test]
#[should_panic(expected = "outside an active traversal step")]
fn prune_after_exhaustion_panics() {
    let mut ranger = Ranger::new(test_fs(), ".", HaltOnError);
    let mut entries = ranger.entries();
    while entries.next().is_some() {}
    entries.prune();
}

// ---------------------------------------------------------------------------
// Error policies
// ---------------------------------------------------------------------------

/// One unreadable subdirectory plus one readable file next to it.
fn locked_fs() -> MemoryFs {
    let mut fs = MemoryFs::new();
    fs.add_file("locked/secret.txt");
    fs.fail_dir("locked", io::ErrorKind::PermissionDenied);
    fs.add_file("visible.txt");
    fs
}

#[test]
fn halt_policy_stops_at_the_first_error() {
    let mut ranger = Ranger::new(locked_fs(), ".", HaltOnError);
    assert_eq!(file_paths(&mut ranger), "");
    assert!(ranger.has_error());
    assert!(ranger.last_error().unwrap().is_permission_denied());
    assert_eq!(ranger.last_error().unwrap().path(), Some("locked"));
}

#[test]
fn ignore_permission_policy_walks_past_unreadable_dirs() {
    let mut ranger = Ranger::new(locked_fs(), ".", IgnorePermissionDenied);
    assert_eq!(file_paths(&mut ranger), "visible.txt");
    // The walk ended on successful visits, so no error is retrievable.
    assert!(!ranger.has_error());
}

#[test]
fn ignore_permission_policy_halts_on_other_errors() {
    let mut fs = MemoryFs::new();
    fs.fail_dir("broken", io::ErrorKind::Other);
    fs.add_file("zzz.txt");

    let mut ranger = Ranger::new(fs, ".", IgnorePermissionDenied);
    assert_eq!(file_paths(&mut ranger), "");
    assert!(ranger.has_error());
    assert!(!ranger.last_error().unwrap().is_permission_denied());
}

#[test]
fn collect_policy_gathers_errors_in_order() {
    let sink = Arc::new(Mutex::new(Vec::new()));
    let mut ranger = Ranger::new(locked_fs(), ".", CollectErrors::new(sink.clone()));
    assert_eq!(file_paths(&mut ranger), "visible.txt");

    let errors = sink.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].is_permission_denied());
}

#[test]
fn ignore_policy_drops_errors_silently() {
    let mut ranger = Ranger::new(locked_fs(), ".", IgnoreErrors);
    assert_eq!(file_paths(&mut ranger), "visible.txt");
    assert!(!ranger.has_error());
}

#[test]
fn closure_policy_is_invoked_once_per_error() {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    let policy = move |_err: &WalkError, entry: &Entry| {
        assert_eq!(entry.path(), "locked");
        counter.fetch_add(1, Ordering::SeqCst);
        true
    };

    let mut ranger = Ranger::new(locked_fs(), ".", policy);
    assert_eq!(file_paths(&mut ranger), "visible.txt");
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn policy_is_not_invoked_for_successful_visits() {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    let mut ranger = Ranger::new(test_fs(), ".", move |_: &WalkError, _: &Entry| {
        counter.fetch_add(1, Ordering::SeqCst);
        true
    });
    assert_eq!(ranger.file_paths().count(), 7);
    assert_eq!(seen.load(Ordering::SeqCst), 0);
}

#[test]
fn missing_root_is_reported_through_the_policy() {
    let mut ranger = Ranger::new(MemoryFs::new(), "missing", HaltOnError);
    assert_eq!(file_paths(&mut ranger), "");
    assert!(ranger.last_error().unwrap().is_not_found());

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("missing").to_string_lossy().into_owned();
    let mut ranger = Ranger::new(OsFs, root, HaltOnError);
    assert_eq!(ranger.file_paths().count(), 0);
    assert!(ranger.has_error());
}

// ---------------------------------------------------------------------------
// Laziness and cancellation
// ---------------------------------------------------------------------------

/// Wraps another namespace and counts cursor advances, so tests can verify
/// how much walking a partial consumption actually performed.
struct CountingFs {
    inner: MemoryFs,
    advances: Arc<AtomicUsize>,
    aborted: Arc<AtomicBool>,
}

impl Namespace for CountingFs {
    fn path_style(&self) -> PathStyle {
        self.inner.path_style()
    }

    fn walk(&self, root: &str) -> Box<dyn Cursor> {
        Box::new(CountingCursor {
            inner: self.inner.walk(root),
            advances: self.advances.clone(),
            aborted: self.aborted.clone(),
        })
    }
}

struct CountingCursor {
    inner: Box<dyn Cursor>,
    advances: Arc<AtomicUsize>,
    aborted: Arc<AtomicBool>,
}

impl Cursor for CountingCursor {
    fn advance(&mut self, disposition: Disposition) -> Option<Node> {
        if disposition == Disposition::Abort {
            self.aborted.store(true, Ordering::SeqCst);
        } else {
            self.advances.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.advance(disposition)
    }
}

#[test]
fn early_termination_stops_the_walk() {
    let mut inner = MemoryFs::new();
    inner.add_file("a.txt");
    inner.add_file("b.txt");
    inner.add_file("c.txt");

    let advances = Arc::new(AtomicUsize::new(0));
    let aborted = Arc::new(AtomicBool::new(false));
    let fs = CountingFs {
        inner,
        advances: advances.clone(),
        aborted: aborted.clone(),
    };

    let mut ranger = Ranger::new(fs, ".", HaltOnError);
    let first = ranger.file_paths().next();
    assert_eq!(first.as_deref(), Some("a.txt"));

    // Exactly the root and the first file were materialized, then the
    // abandoned iterator aborted the walk.
    assert_eq!(advances.load(Ordering::SeqCst), 2);
    assert!(aborted.load(Ordering::SeqCst));
}
