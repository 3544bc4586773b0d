//! Command-line interface module for nametag.
//!
//! This module handles all CLI-related functionality including:
//! - Configuration loading
//! - Feeding the session from a folder or an explicit file list
//! - Listing entries, tags and entry types
//! - Running batch tag edits, for real or as a dry run
//! - Text or JSON output

use crate::batch::BatchOutcome;
use crate::config::TaggerConfig;
use crate::interaction::{CollectingReporter, Picker, Reporter};
use crate::locale::Language;
use crate::output::OutputFormatter;
use crate::renamer::TagMutation;
use crate::session::Session;
use crate::tag::Tag;
use crate::tag_index::{ExtSelector, TagSelector};
use indicatif::ProgressBar;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Where the entries of a command come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Every entry below a folder.
    Folder(PathBuf),
    /// Exactly these files or folders.
    Files(Vec<PathBuf>),
}

/// Tag and type filters narrowing a command to some entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub tag: TagSelector,
    pub ext: ExtSelector,
}

/// The tag edit requested on the command line, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRequest {
    Toggle(String),
    Add(String),
    Remove(String),
    Strip,
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCommand {
    /// Print the entries passing the filters.
    List { filters: Filters },
    /// Print every tag in use.
    Tags,
    /// Print every entry type present.
    Types,
    /// Edit the tags of every entry passing the filters.
    Apply {
        request: MutationRequest,
        filters: Filters,
        /// If true, report the new names without renaming anything.
        dry_run: bool,
    },
}

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings that apply to every command.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    /// Explicit configuration file, skipping the lookup chain.
    pub config_path: Option<PathBuf>,
    /// Overrides the configured notification language.
    pub language: Option<Language>,
    pub format: OutputFormat,
}

/// The result of a command, ready to be printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum CommandOutput {
    List { entries: Vec<PathBuf> },
    Tags { tags: Vec<Tag> },
    Types { types: Vec<String> },
    Apply { dry_run: bool, outcome: BatchOutcome },
}

/// Runs the CLI application with the given command and entry source.
///
/// # Examples
///
/// ```no_run
/// use nametag::cli::{run_cli, Source, TagCommand};
/// use std::path::PathBuf;
///
/// let result = run_cli(TagCommand::Tags, Source::Folder(PathBuf::from("/path/to/folder")));
/// match result {
///     Ok(()) => println!("Operation completed successfully"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(command: TagCommand, source: Source) -> Result<(), String> {
    run_cli_with_options(command, source, &CliOptions::default())
}

/// Runs the CLI application with explicit global options.
///
/// # Arguments
///
/// * `command` - The command to execute
/// * `source` - The folder or files to operate on
/// * `options` - Configuration path, language override and output format
pub fn run_cli_with_options(
    command: TagCommand,
    source: Source,
    options: &CliOptions,
) -> Result<(), String> {
    let mut config = TaggerConfig::load(options.config_path.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    if let Some(language) = options.language {
        config.ui.language = language;
    }

    let mut session = Session::from_config(&config)
        .map_err(|e| format!("Error compiling scan rules: {}", e))?;

    match options.format {
        OutputFormat::Text => {
            let mut reporter = ConsoleReporter::new();
            let output = execute(command, source, &mut session, &mut reporter)?;
            print_text(&output, &session);
            Ok(())
        }
        OutputFormat::Json => {
            let mut reporter = CollectingReporter::new();
            let result = execute(command, source, &mut session, &mut reporter);
            let notices = reporter.into_notices();

            let document = match &result {
                Ok(output) => json!({ "result": output, "notices": notices }),
                Err(error) => json!({ "error": error, "notices": notices }),
            };
            let rendered = serde_json::to_string_pretty(&document)
                .map_err(|e| format!("Error serializing output: {}", e))?;
            println!("{}", rendered);

            result.map(|_| ())
        }
    }
}

/// Runs `command` against `session` and returns what it produced.
///
/// A tag to apply is validated before any entry is loaded, so a refused tag
/// leaves the filesystem untouched.
pub fn execute(
    command: TagCommand,
    source: Source,
    session: &mut Session,
    reporter: &mut dyn Reporter,
) -> Result<CommandOutput, String> {
    match command {
        TagCommand::List { filters } => {
            load_source(source, session, reporter)?;
            Ok(CommandOutput::List {
                entries: session.filter(&filters.tag, &filters.ext),
            })
        }
        TagCommand::Tags => {
            load_source(source, session, reporter)?;
            Ok(CommandOutput::Tags {
                tags: session.tags().into_iter().collect(),
            })
        }
        TagCommand::Types => {
            load_source(source, session, reporter)?;
            Ok(CommandOutput::Types {
                types: session.extensions().iter().map(ToString::to_string).collect(),
            })
        }
        TagCommand::Apply {
            request,
            filters,
            dry_run,
        } => {
            let mutation = build_mutation(&request, session, reporter)?;
            load_source(source, session, reporter)?;

            let targets = session.filter(&filters.tag, &filters.ext);
            Ok(CommandOutput::Apply {
                dry_run,
                outcome: session.apply(&targets, &mutation, dry_run, reporter),
            })
        }
    }
}

fn build_mutation(
    request: &MutationRequest,
    session: &Session,
    reporter: &mut dyn Reporter,
) -> Result<TagMutation, String> {
    let raw = match request {
        MutationRequest::Toggle(raw) | MutationRequest::Add(raw) | MutationRequest::Remove(raw) => {
            raw
        }
        MutationRequest::Strip => return Ok(TagMutation::Strip),
    };

    let tag = session
        .parse_tag(raw, reporter)
        .ok_or_else(|| format!("Tag '{}' was not applied", raw.trim()))?;

    Ok(match request {
        MutationRequest::Toggle(_) => TagMutation::Toggle(tag),
        MutationRequest::Add(_) => TagMutation::Add(tag),
        MutationRequest::Remove(_) => TagMutation::Remove(tag),
        MutationRequest::Strip => TagMutation::Strip,
    })
}

fn load_source(
    source: Source,
    session: &mut Session,
    reporter: &mut dyn Reporter,
) -> Result<usize, String> {
    if let Source::Folder(root) = &source
        && !root.is_dir()
    {
        return Err(format!(
            "Error reading directory {}: not a directory",
            root.display()
        ));
    }

    let is_folder = matches!(source, Source::Folder(_));
    let mut picker = ArgumentPicker::new(source);
    let loaded = if is_folder {
        session.open_folder(&mut picker, reporter)
    } else {
        session.open_files(&mut picker)
    };

    loaded.ok_or_else(|| "No folder or files given".to_string())
}

fn print_text(output: &CommandOutput, session: &Session) {
    let messages = session.messages();

    match output {
        CommandOutput::List { entries } => {
            if entries.is_empty() {
                OutputFormatter::info("No entries match.");
                return;
            }
            for entry in entries {
                OutputFormatter::plain(&entry.display().to_string());
            }
            OutputFormatter::info(&format!(
                "{} of {} entries",
                entries.len(),
                session.table().len()
            ));
        }
        CommandOutput::Tags { tags } => {
            if tags.is_empty() {
                OutputFormatter::info("No tags found.");
            }
            for tag in tags {
                OutputFormatter::plain(tag.as_str());
            }
        }
        CommandOutput::Types { types } => {
            OutputFormatter::plain(messages.get("all"));
            for kind in types {
                let label = match kind.as_str() {
                    "folder" => messages.get("folder"),
                    ext => ext,
                };
                OutputFormatter::plain(label);
            }
        }
        CommandOutput::Apply { dry_run, outcome } => {
            if *dry_run {
                OutputFormatter::dry_run_notice("No entries were renamed.");
            }
            OutputFormatter::batch_summary(outcome, *dry_run);
            if !*dry_run && !outcome.renamed.is_empty() {
                OutputFormatter::success("Tags updated.");
            }
        }
    }
}

/// Answers the [`Picker`] questions from command-line arguments.
///
/// Each answer is handed out once; asking again yields `None`.
#[derive(Debug)]
pub struct ArgumentPicker {
    folder: Option<PathBuf>,
    files: Option<Vec<PathBuf>>,
}

impl ArgumentPicker {
    pub fn new(source: Source) -> Self {
        match source {
            Source::Folder(folder) => Self {
                folder: Some(folder),
                files: None,
            },
            Source::Files(files) => Self {
                folder: None,
                files: Some(files).filter(|files| !files.is_empty()),
            },
        }
    }
}

impl Picker for ArgumentPicker {
    fn pick_folder(&mut self) -> Option<PathBuf> {
        self.folder.take()
    }

    fn pick_files(&mut self) -> Option<Vec<PathBuf>> {
        self.files.take()
    }
}

/// Prints notifications to the terminal and drives the batch progress bar.
pub struct ConsoleReporter {
    progress: ProgressBar,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            progress: ProgressBar::hidden(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn warning(&mut self, title: &str, message: &str) {
        self.progress
            .suspend(|| OutputFormatter::warning(&format!("{}: {}", title, message)));
    }

    fn error(&mut self, title: &str, message: &str) {
        self.progress
            .suspend(|| OutputFormatter::error(&format!("{}: {}", title, message)));
    }

    fn batch_started(&mut self, total: usize) {
        self.progress = OutputFormatter::create_progress_bar(total as u64);
    }

    fn progress(&mut self, current: &Path) {
        let name = current
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.progress.set_message(name);
        self.progress.inc(1);
    }

    fn batch_finished(&mut self) {
        self.progress.finish_and_clear();
    }
}
