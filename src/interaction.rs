//! Collaborators supplied by the presentation layer.
//!
//! The tagging core never prompts or prints on its own. It asks a [`Picker`]
//! for input and tells a [`Reporter`] about recoverable problems, then carries
//! on with the rest of the batch.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Source of the entries a session works on.
pub trait Picker {
    /// Asks for a folder to scan. `None` means nothing was chosen.
    fn pick_folder(&mut self) -> Option<PathBuf>;

    /// Asks for an explicit list of files. `None` means nothing was chosen.
    fn pick_files(&mut self) -> Option<Vec<PathBuf>>;
}

/// Sink for notifications raised while processing entries.
///
/// Calls are synchronous and fire-and-forget: the caller continues with the
/// next item as soon as the call returns.
pub trait Reporter {
    /// A problem that was worked around, e.g. a tag that had to be dropped.
    fn warning(&mut self, title: &str, message: &str);

    /// An operation on one entry that could not be carried out.
    fn error(&mut self, title: &str, message: &str);

    /// A batch of `total` entries is about to be processed.
    fn batch_started(&mut self, _total: usize) {}

    /// Processing of `current` is starting.
    fn progress(&mut self, _current: &Path) {}

    /// The batch is done.
    fn batch_finished(&mut self) {}
}

/// Severity of a collected [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One warning or error, as seen by a [`CollectingReporter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

/// Reporter that keeps every notice in memory.
///
/// Used for machine-readable output, where notices are emitted together with
/// the result instead of being printed as they happen.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    notices: Vec<Notice>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn into_notices(self) -> Vec<Notice> {
        self.notices
    }

    /// Number of notices with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.notices
            .iter()
            .filter(|notice| notice.severity == severity)
            .count()
    }

    fn push(&mut self, severity: Severity, title: &str, message: &str) {
        self.notices.push(Notice {
            severity,
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

impl Reporter for CollectingReporter {
    fn warning(&mut self, title: &str, message: &str) {
        self.push(Severity::Warning, title, message);
    }

    fn error(&mut self, title: &str, message: &str) {
        self.push(Severity::Error, title, message);
    }
}
