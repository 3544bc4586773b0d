//! The application context.
//!
//! A [`Session`] owns the path table together with the settings loaded from
//! configuration. Front ends create one, fill it from a folder or a file
//! selection, and then run filters and batch edits through it.

use crate::batch::{BatchOutcome, batch_apply, plan};
use crate::config::{CompiledScanRules, ConfigError, TaggerConfig};
use crate::interaction::{Picker, Reporter};
use crate::locale::Messages;
use crate::path_table::{PathTable, scan_folder};
use crate::renamer::{TagMutation, TagRenamer};
use crate::tag::{DEFAULT_MAX_TAG_LENGTH, Tag, normalize};
use crate::tag_index::{self, ExtSelector, TagSelector};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Entries under edit plus the settings that govern them.
#[derive(Debug, Clone)]
pub struct Session {
    table: PathTable,
    max_tag_length: usize,
    scan_rules: CompiledScanRules,
    messages: Messages,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            table: PathTable::new(),
            max_tag_length: DEFAULT_MAX_TAG_LENGTH,
            scan_rules: CompiledScanRules::default(),
            messages: Messages::default(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session using the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the scan rules contain an invalid pattern.
    pub fn from_config(config: &TaggerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            table: PathTable::new(),
            max_tag_length: config.tags.max_length,
            scan_rules: config.compile_scan_rules()?,
            messages: Messages::new(config.ui.language),
        })
    }

    pub fn table(&self) -> &PathTable {
        &self.table
    }

    pub fn messages(&self) -> Messages {
        self.messages
    }

    pub fn max_tag_length(&self) -> usize {
        self.max_tag_length
    }

    /// Asks `picker` for a folder and loads it.
    ///
    /// Returns the number of entries found, or `None` (table untouched) when
    /// no folder was chosen.
    pub fn open_folder(
        &mut self,
        picker: &mut dyn Picker,
        reporter: &mut dyn Reporter,
    ) -> Option<usize> {
        let root = picker.pick_folder()?;
        Some(self.load_folder(&root, reporter))
    }

    /// Asks `picker` for files and loads them.
    ///
    /// Returns the number of entries loaded, or `None` (table untouched) when
    /// nothing was chosen.
    pub fn open_files(&mut self, picker: &mut dyn Picker) -> Option<usize> {
        let files = picker.pick_files()?;
        Some(self.load_files(files))
    }

    /// Replaces the table with every entry below `root`.
    ///
    /// Each subtree that cannot be read is reported as a warning.
    pub fn load_folder(&mut self, root: &Path, reporter: &mut dyn Reporter) -> usize {
        let outcome = scan_folder(root, &self.scan_rules);
        for failure in &outcome.failures {
            let (title, message) = self.messages.scan_skipped(failure);
            reporter.warning(&title, &message);
        }

        self.table.replace_all(outcome.entries);
        self.table.len()
    }

    /// Replaces the table with an explicit selection.
    pub fn load_files(&mut self, files: Vec<PathBuf>) -> usize {
        self.table.replace_all(files);
        info!(entries = self.table.len(), "files selected");
        self.table.len()
    }

    /// Every tag currently in use.
    pub fn tags(&self) -> BTreeSet<Tag> {
        tag_index::all_tags(&self.table)
    }

    /// Every entry type currently present.
    pub fn extensions(&self) -> BTreeSet<ExtSelector> {
        tag_index::extensions(&self.table)
    }

    pub fn filter(&self, tag: &TagSelector, ext: &ExtSelector) -> Vec<PathBuf> {
        tag_index::filter(&self.table, tag, ext)
    }

    /// Normalizes a tag typed by the user.
    ///
    /// Blank input yields `None` silently. Input that cannot be a tag is
    /// reported as an error and also yields `None`.
    pub fn parse_tag(&self, raw: &str, reporter: &mut dyn Reporter) -> Option<Tag> {
        if raw.trim().is_empty() {
            return None;
        }

        match normalize(raw, self.max_tag_length) {
            Ok(tag) => Some(tag),
            Err(error) => {
                let (title, message) = self.messages.tag_refused(&error);
                reporter.error(&title, &message);
                None
            }
        }
    }

    /// Applies `mutation` to every entry in `targets`.
    ///
    /// With `dry_run` set nothing is renamed on disk, but the table is
    /// updated with the computed names so it shows the preview.
    pub fn apply(
        &mut self,
        targets: &[PathBuf],
        mutation: &TagMutation,
        dry_run: bool,
        reporter: &mut dyn Reporter,
    ) -> BatchOutcome {
        reporter.batch_started(plan(&self.table, targets).len());

        let outcome = {
            let mut renamer = TagRenamer::new(mutation, &mut *reporter)
                .max_tag_length(self.max_tag_length)
                .messages(self.messages)
                .dry_run(dry_run);
            batch_apply(&mut self.table, targets, |path| renamer.rename(path))
        };

        reporter.batch_finished();
        outcome
    }
}
