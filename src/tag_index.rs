//! Tag and type queries over a [`PathTable`].
//!
//! These feed the two menus of the tool: the list of every tag in use and
//! the list of entry types, and then narrow the table down to the entries a
//! batch should touch.

use crate::name_codec::{decode, split_extension};
use crate::path_table::{EntryKind, PathTable, classify};
use crate::tag::Tag;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which entries pass the tag filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagSelector {
    #[default]
    All,
    /// Entries whose stem contains this literal text.
    Contains(String),
}

impl FromStr for TagSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(TagSelector::All)
        } else {
            Ok(TagSelector::Contains(s.to_string()))
        }
    }
}

/// Which entries pass the type filter.
///
/// Ordered so that `All` comes first and `Folder` second, followed by the
/// extensions alphabetically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ExtSelector {
    #[default]
    All,
    /// Entries classified as directories.
    Folder,
    /// Entries with this lowercase extension, leading dot included.
    Extension(String),
}

impl FromStr for ExtSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Ok(match lowered.as_str() {
            "all" => ExtSelector::All,
            "folder" => ExtSelector::Folder,
            ext if ext.starts_with('.') => ExtSelector::Extension(ext.to_string()),
            ext => ExtSelector::Extension(format!(".{}", ext)),
        })
    }
}

impl fmt::Display for ExtSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtSelector::All => f.write_str("all"),
            ExtSelector::Folder => f.write_str("folder"),
            ExtSelector::Extension(ext) => f.write_str(ext),
        }
    }
}

/// The type of an entry as a selector: `Folder` or its lowercase extension.
pub fn entry_extension(path: &Path) -> ExtSelector {
    match classify(path) {
        EntryKind::Directory => ExtSelector::Folder,
        EntryKind::File(ext) => ExtSelector::Extension(ext.to_lowercase()),
    }
}

/// Every distinct tag found in the table, lowercased and sorted.
pub fn all_tags(table: &PathTable) -> BTreeSet<Tag> {
    table
        .iter()
        .flat_map(|path| {
            let stem = stem_of(path);
            let (_, tags) = decode(&stem);
            tags.into_iter().map(|tag| tag.lowercased()).collect::<Vec<_>>()
        })
        .collect()
}

/// Every distinct entry type in the table.
pub fn extensions(table: &PathTable) -> BTreeSet<ExtSelector> {
    table.iter().map(|path| entry_extension(path)).collect()
}

/// Entries passing both selectors, in table order.
pub fn filter(table: &PathTable, tag: &TagSelector, ext: &ExtSelector) -> Vec<PathBuf> {
    table
        .iter()
        .filter(|path| matches_tag(path, tag) && matches_ext(path, ext))
        .cloned()
        .collect()
}

fn matches_tag(path: &Path, selector: &TagSelector) -> bool {
    match selector {
        TagSelector::All => true,
        TagSelector::Contains(needle) => stem_of(path).contains(needle.as_str()),
    }
}

fn matches_ext(path: &Path, selector: &ExtSelector) -> bool {
    match selector {
        ExtSelector::All => true,
        other => entry_extension(path) == *other,
    }
}

/// The name of `path` without its extension.
fn stem_of(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    split_extension(&name).0.to_string()
}
