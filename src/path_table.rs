//! The in-memory table of known entries.
//!
//! A [`PathTable`] is filled wholesale by a folder scan or a file selection
//! and then edited in place as entries are renamed. Renaming a directory
//! rewrites the prefix of every tracked descendant, so the table never needs
//! to be re-scanned to stay consistent with the filesystem.

use crate::config::CompiledScanRules;
use crate::name_codec::split_extension;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// How an entry is treated by the tagging rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A name with an extension; the extension keeps its leading dot.
    File(String),
    /// A name without an extension.
    Directory,
}

impl EntryKind {
    pub fn is_directory(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// The extension, empty for directories.
    pub fn extension(&self) -> &str {
        match self {
            EntryKind::File(ext) => ext,
            EntryKind::Directory => "",
        }
    }
}

/// Classifies an entry by its final path segment alone.
///
/// An entry is a directory iff its name has no extension. No filesystem call
/// is made, so an extension-less file such as `README` counts as a directory.
///
/// ```
/// use nametag::path_table::{classify, EntryKind};
/// use std::path::Path;
///
/// assert_eq!(classify(Path::new("/data/a.txt")), EntryKind::File(".txt".into()));
/// assert_eq!(classify(Path::new("/data/proj")), EntryKind::Directory);
/// ```
pub fn classify(path: &Path) -> EntryKind {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    match split_extension(&name) {
        (_, "") => EntryKind::Directory,
        (_, ext) => EntryKind::File(ext.to_string()),
    }
}

/// Makes `path` absolute and folds `.` and `..` lexically.
///
/// Symlinks are not resolved and the path does not need to exist.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// A part of a folder scan that could not be read.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A directory (or the root itself) could not be listed.
    #[error("Cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl ScanError {
    /// The path that was skipped.
    pub fn path(&self) -> &Path {
        match self {
            ScanError::Unreadable { path, .. } => path,
        }
    }
}

/// Entries found by a scan, plus the subtrees that had to be skipped.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub entries: Vec<PathBuf>,
    pub failures: Vec<ScanError>,
}

/// Recursively lists every file and directory below `root`.
///
/// The walk is pre-order with siblings sorted by name, so the result is
/// deterministic for a given snapshot. `root` itself is not listed. Entries
/// rejected by `rules` are left out together with their subtrees.
///
/// Unreadable subtrees are skipped and recorded in
/// [`ScanOutcome::failures`]; the rest of the walk continues.
pub fn scan_folder(root: &Path, rules: &CompiledScanRules) -> ScanOutcome {
    let root = normalize_path(root);
    let mut outcome = ScanOutcome::default();

    let walker = WalkDir::new(&root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| rules.should_include(entry.path()));

    for item in walker {
        match item {
            Ok(entry) => outcome.entries.push(entry.into_path()),
            Err(source) => {
                let path = source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.clone());
                warn!(path = %path.display(), error = %source, "skipping unreadable path");
                outcome
                    .failures
                    .push(ScanError::Unreadable { path, source });
            }
        }
    }

    info!(
        root = %root.display(),
        entries = outcome.entries.len(),
        skipped = outcome.failures.len(),
        "folder scanned"
    );
    outcome
}

/// Ordered, duplicate-free list of entry paths.
///
/// Membership checks go through a position index kept next to the list, so
/// they stay constant time on large scans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTable {
    entries: Vec<PathBuf>,
    index: HashMap<PathBuf, usize>,
}

impl PathTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table the same way [`PathTable::replace_all`] fills one.
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut table = Self::new();
        table.replace_all(paths);
        table
    }

    /// Discards the current entries and installs `paths`.
    ///
    /// Each path is normalized; later duplicates of a path are dropped.
    pub fn replace_all<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.install(paths.into_iter().map(|path| normalize_path(&path)));
    }

    /// Rebuilds the list and its index, keeping the first of any repeats.
    fn install<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.entries.clear();
        self.index.clear();
        for path in paths {
            if !self.index.contains_key(&path) {
                self.index.insert(path.clone(), self.entries.len());
                self.entries.push(path);
            }
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.index.contains_key(path)
    }

    /// Records that `old` now lives at `new`.
    ///
    /// The entry for `old` is replaced in place. When `old` classifies as a
    /// directory, every tracked path below it gets its `old` prefix swapped
    /// for `new`. Returns the number of descendants rewritten.
    pub fn rename_entry(&mut self, old: &Path, new: &Path) -> usize {
        if old == new {
            return 0;
        }

        // When `new` is already tracked, that entry stays and the old one goes.
        let mut collided = self.contains(new);
        if let Some(pos) = self.index.remove(old) {
            if collided {
                self.entries.remove(pos);
            } else {
                self.entries[pos] = new.to_path_buf();
                self.index.insert(new.to_path_buf(), pos);
            }
        }

        let mut rewritten = 0;
        if classify(old).is_directory() {
            for (pos, entry) in self.entries.iter_mut().enumerate() {
                if let Ok(rest) = entry.strip_prefix(old)
                    && !rest.as_os_str().is_empty()
                {
                    let moved = new.join(rest);
                    self.index.remove(entry.as_path());
                    collided |= self.index.insert(moved.clone(), pos).is_some();
                    *entry = moved;
                    rewritten += 1;
                }
            }
        }

        if collided {
            let entries = std::mem::take(&mut self.entries);
            self.install(entries);
        }

        if rewritten > 0 {
            debug!(
                from = %old.display(),
                to = %new.display(),
                descendants = rewritten,
                "cascaded directory rename"
            );
        }
        rewritten
    }
}

impl<'a> IntoIterator for &'a PathTable {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn table(paths: &[&str]) -> PathTable {
        PathTable::from_paths(paths.iter().map(PathBuf::from))
    }

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(
            classify(Path::new("/data/report.pdf")),
            EntryKind::File(".pdf".to_string())
        );
        assert_eq!(classify(Path::new("/data/proj")), EntryKind::Directory);
        assert_eq!(
            classify(Path::new("/data/proj_[#wip]")),
            EntryKind::Directory
        );
        assert_eq!(classify(Path::new("/data/.config")), EntryKind::Directory);
    }

    #[test]
    fn test_classify_extensionless_file_as_directory() {
        // Name-based rule: a file called README is indistinguishable from a folder.
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let readme = temp_dir.path().join("README");
        fs::write(&readme, "docs").expect("Failed to write file");

        assert!(readme.is_file());
        assert_eq!(classify(&readme), EntryKind::Directory);
    }

    #[test]
    fn test_normalize_path_folds_dots() {
        assert_eq!(
            normalize_path(Path::new("/data/./a/../b.txt")),
            PathBuf::from("/data/b.txt")
        );
    }

    #[test]
    fn test_normalize_path_makes_relative_absolute() {
        let normalized = normalize_path(Path::new("some/file.txt"));
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("some/file.txt"));
    }

    #[test]
    fn test_replace_all_drops_duplicates_keeping_order() {
        let table = table(&["/data/b", "/data/a.txt", "/data/b", "/data/./a.txt"]);
        assert_eq!(
            table.paths(),
            &[PathBuf::from("/data/b"), PathBuf::from("/data/a.txt")]
        );
    }

    #[test]
    fn test_replace_all_discards_previous_entries() {
        let mut table = table(&["/data/old.txt"]);
        table.replace_all(vec![PathBuf::from("/data/new.txt")]);
        assert_eq!(table.len(), 1);
        assert!(table.contains(Path::new("/data/new.txt")));
        assert!(!table.contains(Path::new("/data/old.txt")));
    }

    #[test]
    fn test_rename_file_entry() {
        let mut table = table(&["/data/a.txt", "/data/b.txt"]);
        let moved = table.rename_entry(Path::new("/data/a.txt"), Path::new("/data/a_[#x].txt"));

        assert_eq!(moved, 0);
        assert_eq!(
            table.paths(),
            &[PathBuf::from("/data/a_[#x].txt"), PathBuf::from("/data/b.txt")]
        );
    }

    #[test]
    fn test_rename_directory_cascades() {
        let mut table = table(&["/data/D", "/data/D/x.txt", "/data/D/sub", "/data/D/sub/y.md"]);
        let moved = table.rename_entry(Path::new("/data/D"), Path::new("/data/D2"));

        assert_eq!(moved, 3);
        assert_eq!(
            table.paths(),
            &[
                PathBuf::from("/data/D2"),
                PathBuf::from("/data/D2/x.txt"),
                PathBuf::from("/data/D2/sub"),
                PathBuf::from("/data/D2/sub/y.md"),
            ]
        );
        assert!(
            table
                .iter()
                .all(|p| !p.starts_with("/data/D") || p.starts_with("/data/D2"))
        );
    }

    #[test]
    fn test_rename_directory_leaves_siblings_with_shared_prefix() {
        let mut table = table(&["/data/D", "/data/D/x.txt", "/data/Dx", "/data/Dx/y.txt"]);
        table.rename_entry(Path::new("/data/D"), Path::new("/data/E"));

        assert!(table.contains(Path::new("/data/E/x.txt")));
        assert!(table.contains(Path::new("/data/Dx")));
        assert!(table.contains(Path::new("/data/Dx/y.txt")));
    }

    #[test]
    fn test_rename_to_same_path_is_noop() {
        let original = table(&["/data/D", "/data/D/x.txt"]);
        let mut renamed = original.clone();
        assert_eq!(renamed.rename_entry(Path::new("/data/D"), Path::new("/data/D")), 0);
        assert_eq!(renamed, original);
    }

    #[test]
    fn test_rename_onto_tracked_path_keeps_entries_unique() {
        let mut table = table(&["/data/a.txt", "/data/b.txt"]);
        table.rename_entry(Path::new("/data/a.txt"), Path::new("/data/b.txt"));
        assert_eq!(table.paths(), &[PathBuf::from("/data/b.txt")]);
    }

    #[test]
    fn test_lookups_follow_renames() {
        let mut table = table(&["/data/D", "/data/D/x.txt", "/data/a.txt"]);
        table.rename_entry(Path::new("/data/D"), Path::new("/data/E"));
        table.rename_entry(Path::new("/data/a.txt"), Path::new("/data/b.txt"));

        for gone in ["/data/D", "/data/D/x.txt", "/data/a.txt"] {
            assert!(!table.contains(Path::new(gone)), "{gone} still tracked");
        }
        for live in ["/data/E", "/data/E/x.txt", "/data/b.txt"] {
            assert!(table.contains(Path::new(live)), "{live} not tracked");
        }
        assert_eq!(table, PathTable::from_paths(table.paths().to_vec()));
    }

    #[test]
    fn test_cascade_onto_tracked_directory_keeps_entries_unique() {
        let mut table = table(&["/data/D", "/data/D/x.txt", "/data/E", "/data/E/x.txt"]);
        table.rename_entry(Path::new("/data/D"), Path::new("/data/E"));

        assert_eq!(table.len(), 2);
        assert!(table.contains(Path::new("/data/E")));
        assert!(table.contains(Path::new("/data/E/x.txt")));
        assert!(!table.contains(Path::new("/data/D/x.txt")));
        assert_eq!(table, PathTable::from_paths(table.paths().to_vec()));
    }

    #[test]
    fn test_scan_folder_lists_everything_in_preorder() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("b/inner")).expect("Failed to create dirs");
        fs::write(root.join("a.txt"), "a").expect("Failed to write file");
        fs::write(root.join("b/inner/c.md"), "c").expect("Failed to write file");
        fs::write(root.join("b/d.txt"), "d").expect("Failed to write file");

        let outcome = scan_folder(root, &CompiledScanRules::default());
        let base = normalize_path(root);
        let relative: Vec<_> = outcome
            .entries
            .iter()
            .map(|p| p.strip_prefix(&base).unwrap().to_path_buf())
            .collect();

        assert!(outcome.failures.is_empty());
        assert_eq!(
            relative,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b"),
                PathBuf::from("b/d.txt"),
                PathBuf::from("b/inner"),
                PathBuf::from("b/inner/c.md"),
            ]
        );
        assert!(outcome.entries.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_scan_missing_root_reports_failure() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("does-not-exist");

        let outcome = scan_folder(&missing, &CompiledScanRules::default());
        assert!(outcome.entries.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].path(), normalize_path(&missing));
    }
}
