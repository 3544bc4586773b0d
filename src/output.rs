//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: colored messages,
//! the batch progress bar and the rename summary. Machine-readable output
//! bypasses this module entirely.

use crate::batch::BatchOutcome;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for batches
/// - Rename summaries
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nametag::output::OutputFormatter;
    /// OutputFormatter::success("Tags updated");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for a batch of `total` entries.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nametag::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints one line per rename followed by the totals.
    pub fn batch_summary(outcome: &BatchOutcome, dry_run: bool) {
        let arrow = if dry_run { "→ would rename to" } else { "→" };
        for rename in &outcome.renamed {
            println!(
                " - {} {} {}",
                display_name(&rename.from),
                arrow,
                display_name(&rename.to).green()
            );
        }

        Self::header("SUMMARY");
        let renamed = outcome.renamed.len();
        println!(
            "{:<10} | {} {}",
            if dry_run { "Planned" } else { "Renamed" },
            renamed.to_string().green().bold(),
            if renamed == 1 { "entry" } else { "entries" }
        );
        println!(
            "{:<10} | {} {}",
            "Unchanged",
            outcome.unchanged,
            if outcome.unchanged == 1 { "entry" } else { "entries" }
        );
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
