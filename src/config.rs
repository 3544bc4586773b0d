//! Configuration loading and scan filtering.
//!
//! Settings are read from a TOML file. Every section is optional, and an
//! absent file means defaults: tags up to 120 characters, every entry
//! scanned, English notifications.
//!
//! # Configuration File Format
//!
//! ```toml
//! [tags]
//! max_length = 120
//!
//! [scan]
//! include_hidden = true
//! exclude_patterns = ["**/.git", "**/node_modules"]
//! exclude_regex = ['^~\$']
//!
//! [ui]
//! language = "en"
//! ```

use crate::locale::Language;
use crate::tag::DEFAULT_MAX_TAG_LENGTH;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern '{0}': expected *.ext or dir/**")]
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// A tag length limit of zero would reject every tag.
    #[error("Invalid tag length limit: {0} (must be at least 1)")]
    InvalidMaxLength(usize),
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaggerConfig {
    #[serde(default)]
    pub tags: TagSettings,

    #[serde(default)]
    pub scan: ScanRules,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Settings applied when tags are normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSettings {
    /// Longest accepted tag body, in characters.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for TagSettings {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
        }
    }
}

fn default_max_length() -> usize {
    DEFAULT_MAX_TAG_LENGTH
}

/// Rules deciding which entries a folder scan picks up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRules {
    /// Whether entries whose name starts with "." are scanned. Defaults to true.
    #[serde(default = "default_include_hidden")]
    pub include_hidden: bool,

    /// Glob patterns matched against the full path (e.g. "**/.git").
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Regex patterns matched against the entry name.
    #[serde(default)]
    pub exclude_regex: Vec<String>,
}

impl Default for ScanRules {
    fn default() -> Self {
        Self {
            include_hidden: default_include_hidden(),
            exclude_patterns: Vec::new(),
            exclude_regex: Vec::new(),
        }
    }
}

fn default_include_hidden() -> bool {
    true
}

/// Presentation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default)]
    pub language: Language,
}

impl TaggerConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.nametagrc.toml` in the current directory
    /// 3. Look for `~/.config/nametag/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read, or if any file found is not valid.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".nametagrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("nametag")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::InvalidMaxLength` if `tags.max_length` is zero.
    /// Returns `ConfigError::IoError` if file cannot be read.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;

        if config.tags.max_length == 0 {
            return Err(ConfigError::InvalidMaxLength(config.tags.max_length));
        }
        Ok(config)
    }

    /// Compile the scan rules into matchers.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile_scan_rules(&self) -> Result<CompiledScanRules, ConfigError> {
        CompiledScanRules::new(&self.scan)
    }
}

/// Scan rules with every pattern compiled once up front.
#[derive(Debug, Clone)]
pub struct CompiledScanRules {
    include_hidden: bool,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
}

impl Default for CompiledScanRules {
    /// Rules that let every entry through.
    fn default() -> Self {
        Self {
            include_hidden: true,
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
        }
    }
}

impl CompiledScanRules {
    /// Create compiled rules from their configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex patterns are invalid.
    pub fn new(rules: &ScanRules) -> Result<Self, ConfigError> {
        let exclude_patterns = rules
            .exclude_patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = rules
            .exclude_regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include_hidden: rules.include_hidden,
            exclude_patterns,
            exclude_regexes,
        })
    }

    /// Check if an entry should be scanned.
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. Hidden entry filter - if hidden and disabled, exclude
    /// 2. Glob pattern match on the path - if matched, exclude
    /// 3. Regex match on the name - if matched, exclude
    /// 4. Default: include
    pub fn should_include(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if !self.include_hidden && name.starts_with('.') {
            return false;
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(path))
        {
            return false;
        }

        !self.exclude_regexes.iter().any(|regex| regex.is_match(&name))
    }
}
