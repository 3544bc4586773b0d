//! Deepest-first batch renames over a [`PathTable`].
//!
//! A batch visits its targets from the deepest path to the shallowest, so a
//! file inside a directory is renamed before the directory itself. After
//! each rename the table is updated, including the directory cascade, which
//! keeps the still-pending targets pointing at live paths.

use crate::path_table::PathTable;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A single rename that took effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rename {
    /// The path before the rename.
    pub from: PathBuf,
    /// The path after the rename.
    pub to: PathBuf,
}

/// Result of one [`batch_apply`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Renames in the order they were applied.
    pub renamed: Vec<Rename>,
    /// Planned targets whose path stayed the same.
    pub unchanged: usize,
}

impl BatchOutcome {
    /// Total number of planned targets that were processed.
    pub fn processed(&self) -> usize {
        self.renamed.len() + self.unchanged
    }
}

/// Number of components in `path`; the root counts as one.
pub fn depth(path: &Path) -> usize {
    path.components().count()
}

/// Orders `targets` for processing.
///
/// Targets not tracked by `table` are dropped, as are repeats. The rest are
/// sorted by depth, deepest first; targets of equal depth keep their
/// selection order.
pub fn plan(table: &PathTable, targets: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut planned: Vec<PathBuf> = targets
        .iter()
        .filter(|path| table.contains(path))
        .filter(|path| seen.insert(*path))
        .cloned()
        .collect();

    planned.sort_by_key(|path| std::cmp::Reverse(depth(path)));
    planned
}

/// Applies `transform` to every planned target and records the results.
///
/// `transform` receives the current path of an entry and returns the path it
/// has afterwards; returning the input means nothing happened. A target that
/// is no longer tracked when its turn comes is skipped. Renames already
/// applied are never rolled back.
pub fn batch_apply<F>(table: &mut PathTable, targets: &[PathBuf], mut transform: F) -> BatchOutcome
where
    F: FnMut(&Path) -> PathBuf,
{
    let planned = plan(table, targets);
    let mut outcome = BatchOutcome::default();

    for path in planned {
        if !table.contains(&path) {
            debug!(path = %path.display(), "target moved before its turn, skipping");
            continue;
        }

        let new_path = transform(&path);
        if new_path == path {
            outcome.unchanged += 1;
            continue;
        }

        table.rename_entry(&path, &new_path);
        outcome.renamed.push(Rename {
            from: path,
            to: new_path,
        });
    }

    info!(
        renamed = outcome.renamed.len(),
        unchanged = outcome.unchanged,
        "batch finished"
    );
    outcome
}
