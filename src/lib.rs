//! nametag - tags that live in file and folder names
//!
//! This library encodes a set of `#tags` into the name of a file or folder
//! (`report_[#draft,#urgent].pdf`), keeps an in-memory table of the entries
//! being edited, and applies tag edits to whole batches of entries while
//! keeping the table consistent when folders are renamed. Scan rules and
//! tag limits come from an optional TOML configuration file.

pub mod batch;
pub mod cli;
pub mod config;
pub mod interaction;
pub mod locale;
pub mod name_codec;
pub mod output;
pub mod path_table;
pub mod renamer;
pub mod session;
pub mod tag;
pub mod tag_index;

pub use batch::{BatchOutcome, Rename, batch_apply};
pub use config::{CompiledScanRules, ConfigError, TaggerConfig};
pub use interaction::{CollectingReporter, Picker, Reporter};
pub use path_table::{EntryKind, PathTable};
pub use renamer::{RenameError, TagMutation, TagRenamer};
pub use session::Session;
pub use tag::{Tag, TagError, TagSet};
pub use tag_index::{ExtSelector, TagSelector};

pub use cli::{Source, TagCommand, run_cli};
