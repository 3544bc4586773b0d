//! Tag normalization and the canonical [`Tag`] type.
//!
//! Every tag written into a name goes through [`normalize`]: a leading `#` is
//! stripped, the body is lowercased, spaces become `_`, and the result is
//! checked against the configured maximum length.
//!
//! # Examples
//!
//! ```
//! use nametag::tag::{normalize, DEFAULT_MAX_TAG_LENGTH};
//!
//! let tag = normalize("#Work In Progress", DEFAULT_MAX_TAG_LENGTH).unwrap();
//! assert_eq!(tag.as_str(), "#work_in_progress");
//! ```

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum number of characters allowed in a tag body (without the `#`).
pub const DEFAULT_MAX_TAG_LENGTH: usize = 120;

/// Characters that would corrupt a tag block if they appeared inside a tag.
const RESERVED_CHARS: [char; 6] = [',', '[', ']', '#', '/', '\\'];

/// Errors produced while normalizing a tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// The normalized body is longer than the configured maximum.
    #[error("Tag '{tag}' exceeds {max} characters")]
    TagTooLong {
        /// The normalized tag, `#` included.
        tag: String,
        /// The configured maximum body length.
        max: usize,
    },
    /// Nothing is left once `#` and whitespace are stripped.
    #[error("Tag is empty")]
    Empty,
    /// The body contains a character reserved by the name encoding.
    #[error("Tag '{tag}' contains the reserved character '{ch}'")]
    InvalidCharacter {
        /// The normalized tag, `#` included.
        tag: String,
        /// The first offending character.
        ch: char,
    },
}

/// A canonical tag: `#` followed by a lowercase body.
///
/// Tags only exist as fragments of file names; two tags are equal iff their
/// strings are equal. Ordering is plain string ordering, which is what gives
/// encoded tag blocks their deterministic layout.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Tag(String);

/// The set of tags carried by one name, kept in sorted order.
pub type TagSet = BTreeSet<Tag>;

impl Tag {
    /// Builds a tag from a fragment found inside an existing tag block.
    ///
    /// The fragment is trimmed and its leading `#` characters removed, but it
    /// is not validated: decoding reports what the name contains.
    pub(crate) fn from_fragment(fragment: &str) -> Option<Self> {
        let body = fragment.trim().trim_start_matches('#');
        if body.is_empty() {
            None
        } else {
            Some(Self(format!("#{}", body)))
        }
    }

    /// The full tag string, `#` included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tag without its leading `#`.
    pub fn body(&self) -> &str {
        &self.0[1..]
    }

    /// Returns a copy with the body lowercased.
    pub(crate) fn lowercased(&self) -> Self {
        Self(self.0.to_lowercase())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Tag {
    type Err = TagError;

    /// Normalizes with [`DEFAULT_MAX_TAG_LENGTH`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s, DEFAULT_MAX_TAG_LENGTH)
    }
}

/// Canonicalizes a raw, user-entered tag.
///
/// # Errors
///
/// * [`TagError::Empty`] if nothing remains after stripping `#` and whitespace.
/// * [`TagError::InvalidCharacter`] if the body contains `,`, `[`, `]`, `#`,
///   a path separator or a control character.
/// * [`TagError::TagTooLong`] if the body is longer than `max` characters.
pub fn normalize(raw: &str, max: usize) -> Result<Tag, TagError> {
    let body = raw
        .trim()
        .trim_start_matches('#')
        .trim()
        .to_lowercase()
        .replace(' ', "_");

    if body.is_empty() {
        return Err(TagError::Empty);
    }

    if let Some(ch) = body
        .chars()
        .find(|c| RESERVED_CHARS.contains(c) || c.is_control())
    {
        return Err(TagError::InvalidCharacter {
            tag: format!("#{}", body),
            ch,
        });
    }

    if body.chars().count() > max {
        return Err(TagError::TagTooLong {
            tag: format!("#{}", body),
            max,
        });
    }

    Ok(Tag(format!("#{}", body)))
}
