use clap::{Args, Parser, Subcommand};
use nametag::cli::{
    CliOptions, Filters, MutationRequest, OutputFormat, Source, TagCommand, run_cli_with_options,
};
use nametag::locale::Language;
use nametag::output::OutputFormatter;
use nametag::tag_index::{ExtSelector, TagSelector};
use std::path::PathBuf;
use std::process;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "nametag")]
#[command(about = "Tag files and folders by encoding labels into their names")]
#[command(version)]
struct Cli {
    /// Path to config file (default: .nametagrc.toml, then ~/.config/nametag/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Language for warnings and errors (en, zh)
    #[arg(long, global = true, value_name = "LANG")]
    lang: Option<Language>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Scan every entry below this folder
    #[arg(long, value_name = "DIR")]
    folder: Option<PathBuf>,

    /// Work on exactly these files or folders
    #[arg(long, value_name = "FILE", num_args = 1..)]
    files: Option<Vec<PathBuf>>,
}

impl SourceArgs {
    fn into_source(self) -> Source {
        match (self.folder, self.files) {
            (Some(folder), _) => Source::Folder(folder),
            (None, files) => Source::Files(files.unwrap_or_default()),
        }
    }
}

#[derive(Args)]
struct FilterArgs {
    /// Only entries whose name contains this text ("all" for every entry)
    #[arg(long = "tag", value_name = "SEL", default_value = "all")]
    tag_filter: TagSelector,

    /// Only entries of this type: an extension, "folder" or "all"
    #[arg(long = "ext", value_name = "SEL", default_value = "all")]
    ext_filter: ExtSelector,
}

impl From<FilterArgs> for Filters {
    fn from(args: FilterArgs) -> Self {
        Filters {
            tag: args.tag_filter,
            ext: args.ext_filter,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List entries passing the filters
    List {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// List every tag in use
    Tags {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// List every entry type present
    Types {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Add a tag where it is missing and remove it where it is present
    Toggle {
        /// Tag to toggle, with or without the leading #
        #[arg(value_name = "TAG")]
        label: String,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Show the new names without renaming anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Add a tag to every matching entry
    Add {
        /// Tag to add, with or without the leading #
        #[arg(value_name = "TAG")]
        label: String,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Show the new names without renaming anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove a tag from every matching entry
    Remove {
        /// Tag to remove, with or without the leading #
        #[arg(value_name = "TAG")]
        label: String,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Show the new names without renaming anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove every tag from every matching entry
    Strip {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Show the new names without renaming anything
        #[arg(long)]
        dry_run: bool,
    },
}

impl Commands {
    fn into_parts(self) -> (TagCommand, Source) {
        let apply = |request, filters: FilterArgs, dry_run| TagCommand::Apply {
            request,
            filters: filters.into(),
            dry_run,
        };

        match self {
            Commands::List { source, filters } => (
                TagCommand::List {
                    filters: filters.into(),
                },
                source.into_source(),
            ),
            Commands::Tags { source } => (TagCommand::Tags, source.into_source()),
            Commands::Types { source } => (TagCommand::Types, source.into_source()),
            Commands::Toggle {
                label,
                source,
                filters,
                dry_run,
            } => (
                apply(MutationRequest::Toggle(label), filters, dry_run),
                source.into_source(),
            ),
            Commands::Add {
                label,
                source,
                filters,
                dry_run,
            } => (
                apply(MutationRequest::Add(label), filters, dry_run),
                source.into_source(),
            ),
            Commands::Remove {
                label,
                source,
                filters,
                dry_run,
            } => (
                apply(MutationRequest::Remove(label), filters, dry_run),
                source.into_source(),
            ),
            Commands::Strip {
                source,
                filters,
                dry_run,
            } => (
                apply(MutationRequest::Strip, filters, dry_run),
                source.into_source(),
            ),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr so JSON output stays clean
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let options = CliOptions {
        config_path: cli.config,
        language: cli.lang,
        format: cli.format,
    };
    let (command, source) = cli.command.into_parts();

    if let Err(e) = run_cli_with_options(command, source, &options) {
        OutputFormatter::error(&format!("Error: {}", e));
        process::exit(1);
    }
}
