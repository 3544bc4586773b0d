//! The tag-editing transform used by batch renames.
//!
//! [`TagRenamer::rename`] takes one entry path, rewrites the tag block of its
//! name according to a [`TagMutation`] and renames the entry on disk. Every
//! failure is reported through the [`Reporter`] and turned into "path
//! unchanged", so a batch always runs to the end.

use crate::interaction::Reporter;
use crate::locale::Messages;
use crate::name_codec::{compose, decode, split_extension};
use crate::tag::{DEFAULT_MAX_TAG_LENGTH, Tag, TagSet, normalize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// The edit applied to the tag set of each entry in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMutation {
    /// Remove the tag if present, add it otherwise.
    Toggle(Tag),
    /// Add the tag if missing.
    Add(Tag),
    /// Remove the tag if present.
    Remove(Tag),
    /// Remove every tag, and with them the tag block.
    Strip,
}

impl TagMutation {
    pub fn apply(&self, tags: &mut TagSet) {
        match self {
            TagMutation::Toggle(tag) => {
                if !tags.remove(tag) {
                    tags.insert(tag.clone());
                }
            }
            TagMutation::Add(tag) => {
                tags.insert(tag.clone());
            }
            TagMutation::Remove(tag) => {
                tags.remove(tag);
            }
            TagMutation::Strip => tags.clear(),
        }
    }
}

/// Why an entry kept its old path.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The entry no longer exists on disk.
    #[error("Cannot find {}", path.display())]
    RenameTargetMissing { path: PathBuf },

    /// Another entry already uses the new name.
    #[error("Cannot rename {} to {}: destination exists", from.display(), to.display())]
    RenameConflict { from: PathBuf, to: PathBuf },

    /// Any other failure reported by the filesystem.
    #[error("Failed to rename {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Applies one [`TagMutation`] to entry names, renaming them on disk.
pub struct TagRenamer<'a> {
    mutation: &'a TagMutation,
    max_tag_length: usize,
    messages: Messages,
    reporter: &'a mut dyn Reporter,
    dry_run: bool,
}

impl<'a> TagRenamer<'a> {
    pub fn new(mutation: &'a TagMutation, reporter: &'a mut dyn Reporter) -> Self {
        Self {
            mutation,
            max_tag_length: DEFAULT_MAX_TAG_LENGTH,
            messages: Messages::default(),
            reporter,
            dry_run: false,
        }
    }

    /// Longest tag body kept when existing tags are re-normalized.
    pub fn max_tag_length(mut self, max: usize) -> Self {
        self.max_tag_length = max;
        self
    }

    /// Templates used for reported warnings and errors.
    pub fn messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Compute new paths without touching the filesystem.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the path `path` would have after the mutation.
    ///
    /// Tags already in the name are normalized first, so `#Draft` and
    /// `#draft` are the same tag; those that fail normalization are dropped
    /// with a warning. A name that is not valid UTF-8 is left alone.
    pub fn destination(&mut self, path: &Path) -> PathBuf {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!(path = %path.display(), "name is not valid UTF-8, leaving it unchanged");
            return path.to_path_buf();
        };

        let (stem, extension) = split_extension(name);
        let (core, found) = decode(stem);

        let mut tags = TagSet::new();
        for tag in &found {
            match normalize(tag.as_str(), self.max_tag_length) {
                Ok(tag) => {
                    tags.insert(tag);
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "dropping tag");
                    let (title, message) = self.messages.tag_skipped(&error);
                    self.reporter.warning(&title, &message);
                }
            }
        }

        self.mutation.apply(&mut tags);

        // Without a core name or a block, only the extension would be left.
        if core.is_empty() && tags.is_empty() {
            warn!(path = %path.display(), "no core name left, leaving it unchanged");
            return path.to_path_buf();
        }
        path.with_file_name(compose(core, &tags, extension))
    }

    /// Renames `path` and returns the path it has afterwards.
    ///
    /// On failure the error is reported and `path` itself is returned. When
    /// the name does not change no filesystem call is made. A dry run still
    /// checks the source and destination, so it fails where a real run would.
    pub fn rename(&mut self, path: &Path) -> PathBuf {
        self.reporter.progress(path);

        let destination = self.destination(path);
        if destination == path {
            return destination;
        }

        let result = if self.dry_run {
            check_move(path, &destination)
        } else {
            move_entry(path, &destination)
        };

        match result {
            Ok(()) => {
                debug!(
                    from = %path.display(),
                    to = %destination.display(),
                    dry_run = self.dry_run,
                    "renamed"
                );
                destination
            }
            Err(error) => {
                warn!(%error, "rename failed");
                let (title, message) = self.messages.rename_failed(&error);
                self.reporter.error(&title, &message);
                path.to_path_buf()
            }
        }
    }
}

/// Verifies that `from` exists and `to` does not, without changing anything.
fn check_move(from: &Path, to: &Path) -> Result<(), RenameError> {
    fs::symlink_metadata(from).map_err(|source| source_error(from, source))?;

    if fs::symlink_metadata(to).is_ok() {
        return Err(RenameError::RenameConflict {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }
    Ok(())
}

/// Renames `from` to `to`, refusing to replace an existing entry.
fn move_entry(from: &Path, to: &Path) -> Result<(), RenameError> {
    check_move(from, to)?;
    fs::rename(from, to).map_err(|source| source_error(from, source))
}

fn source_error(from: &Path, source: io::Error) -> RenameError {
    match source.kind() {
        io::ErrorKind::NotFound => RenameError::RenameTargetMissing {
            path: from.to_path_buf(),
        },
        _ => RenameError::Io {
            path: from.to_path_buf(),
            source,
        },
    }
}
