//! Encoding of tag blocks inside file and folder names.
//!
//! A tagged name has the shape
//!
//! ```text
//! <core-name>['_[' '#'tag (',' '#'tag)* ']']['.'<extension>]
//! ```
//!
//! The tag block is always the last segment before the extension, and a name
//! carries at most one. Directories have no extension but are decoded the
//! same way.
//!
//! # Examples
//!
//! ```
//! use nametag::name_codec::{decode, encode, split_extension};
//!
//! let (stem, ext) = split_extension("report_[#draft,#urgent].pdf");
//! let (core, tags) = decode(stem);
//! assert_eq!((core, ext), ("report", ".pdf"));
//! assert_eq!(tags.len(), 2);
//! assert_eq!(encode(core, &tags), "report_[#draft,#urgent]");
//! ```

use crate::tag::{Tag, TagSet};
use regex::Regex;
use std::sync::LazyLock;

/// A trailing `_[#...]` block anchored at the end of the stem.
static TAG_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_\[#([^\]]+)\]$").expect("tag block pattern is valid"));

/// Splits a stem into its core name and the tags found in its tag block.
///
/// The caller passes the name without its extension. Tags are returned as
/// found (each re-prefixed with `#`), without validation. A stem without a
/// tag block is returned unchanged with an empty set.
pub fn decode(stem: &str) -> (&str, TagSet) {
    let Some(captures) = TAG_BLOCK.captures(stem) else {
        return (stem, TagSet::new());
    };

    let block_start = captures.get(0).map_or(stem.len(), |m| m.start());
    let tags = captures
        .get(1)
        .map(|body| {
            body.as_str()
                .split(',')
                .filter_map(Tag::from_fragment)
                .collect()
        })
        .unwrap_or_default();

    (&stem[..block_start], tags)
}

/// Appends a tag block for `tags` to `core`.
///
/// An empty set leaves `core` untouched, so stripping every tag removes the
/// whole block. Tags are written in sorted order.
pub fn encode(core: &str, tags: &TagSet) -> String {
    if tags.is_empty() {
        return core.to_string();
    }

    let joined = tags.iter().map(Tag::as_str).collect::<Vec<_>>().join(",");
    format!("{}_[{}]", core, joined)
}

/// Builds a complete base name: core, tag block, then extension.
pub fn compose(core: &str, tags: &TagSet, extension: &str) -> String {
    format!("{}{}", encode(core, tags), extension)
}

/// Splits a file name at its last `.`, keeping the dot on the extension.
///
/// Leading dots never start an extension, so `.bashrc` has none, while
/// `notes.` has the extension `.`. Names without an extension are treated as
/// directories elsewhere in the crate.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => name.split_at(idx),
        _ => (name, ""),
    }
}
