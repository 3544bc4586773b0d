//! Localized notification texts.
//!
//! Templates are looked up by key and may contain the placeholders `{path}`,
//! `{tag}` and `{max}`. Missing keys fall back to English, then to the key
//! itself.

use crate::path_table::ScanError;
use crate::renamer::RenameError;
use crate::tag::TagError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Interface language for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "zh" | "chinese" => Ok(Language::Zh),
            other => Err(format!("unsupported language '{}': expected en or zh", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => f.write_str("en"),
            Language::Zh => f.write_str("zh"),
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("all", "All"),
    ("folder", "folder"),
    ("error_rename_fail_title", "Rename Error"),
    ("error_rename_fail_msg", "Cannot find: {path}"),
    ("error_rename_conflict_msg", "Already exists, not overwritten: {path}"),
    ("error_rename_io_msg", "Could not rename: {path}"),
    ("warning_long_tag_title", "Tag Too Long"),
    ("warning_long_tag_msg", "Tag \"{tag}\" exceeds {max} chars and was skipped"),
    ("error_long_tag_msg", "Tags are limited to {max} chars"),
    ("warning_invalid_tag_title", "Invalid Tag"),
    ("warning_invalid_tag_msg", "Tag \"{tag}\" is not valid and was skipped"),
    ("warning_scan_title", "Scan Warning"),
    ("warning_scan_msg", "Skipped unreadable path: {path}"),
];

const ZH: &[(&str, &str)] = &[
    ("all", "全部"),
    ("folder", "文件夹"),
    ("error_rename_fail_title", "重命名失败"),
    ("error_rename_fail_msg", "找不到：{path}"),
    ("error_rename_conflict_msg", "目标已存在，未覆盖：{path}"),
    ("error_rename_io_msg", "无法重命名：{path}"),
    ("warning_long_tag_title", "标签太长"),
    ("warning_long_tag_msg", "标签 \"{tag}\" 超过 {max} 字符，已跳过"),
    ("error_long_tag_msg", "限 {max} 字符"),
    ("warning_invalid_tag_title", "无效标签"),
    ("warning_invalid_tag_msg", "标签 \"{tag}\" 无效，已跳过"),
    ("warning_scan_title", "扫描警告"),
    ("warning_scan_msg", "无法读取，已跳过：{path}"),
];

/// Message templates for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    language: Language,
}

impl Default for Messages {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl Messages {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Returns the raw template for `key`.
    pub fn get<'a>(&self, key: &'a str) -> &'a str {
        let table = match self.language {
            Language::En => EN,
            Language::Zh => ZH,
        };
        lookup(table, key)
            .or_else(|| lookup(EN, key))
            .unwrap_or(key)
    }

    /// Returns the template for `key` with each `{name}` replaced.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.get(key).to_string(), |text, (name, value)| {
                text.replace(&format!("{{{}}}", name), value)
            })
    }

    /// Title and message for a tag that was dropped while re-encoding a name.
    pub fn tag_skipped(&self, error: &TagError) -> (String, String) {
        match error {
            TagError::TagTooLong { tag, max } => (
                self.get("warning_long_tag_title").to_string(),
                self.format(
                    "warning_long_tag_msg",
                    &[("tag", tag.as_str()), ("max", max.to_string().as_str())],
                ),
            ),
            TagError::InvalidCharacter { tag, .. } => (
                self.get("warning_invalid_tag_title").to_string(),
                self.format("warning_invalid_tag_msg", &[("tag", tag.as_str())]),
            ),
            TagError::Empty => (
                self.get("warning_invalid_tag_title").to_string(),
                self.format("warning_invalid_tag_msg", &[("tag", "#")]),
            ),
        }
    }

    /// Title and message for a tag the user typed that cannot be used.
    pub fn tag_refused(&self, error: &TagError) -> (String, String) {
        match error {
            TagError::TagTooLong { max, .. } => (
                self.get("warning_long_tag_title").to_string(),
                self.format("error_long_tag_msg", &[("max", max.to_string().as_str())]),
            ),
            other => self.tag_skipped(other),
        }
    }

    /// Title and message for a rename that left its entry untouched.
    pub fn rename_failed(&self, error: &RenameError) -> (String, String) {
        let (key, path) = match error {
            RenameError::RenameTargetMissing { path } => ("error_rename_fail_msg", path),
            RenameError::RenameConflict { to, .. } => ("error_rename_conflict_msg", to),
            RenameError::Io { path, .. } => ("error_rename_io_msg", path),
        };
        (
            self.get("error_rename_fail_title").to_string(),
            self.format(key, &[("path", display(path).as_str())]),
        )
    }

    /// Title and message for a subtree skipped during a folder scan.
    pub fn scan_skipped(&self, error: &ScanError) -> (String, String) {
        (
            self.get("warning_scan_title").to_string(),
            self.format("warning_scan_msg", &[("path", display(error.path()).as_str())]),
        )
    }
}

fn lookup<'a>(table: &[(&str, &'a str)], key: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, text)| *text)
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_replaces_placeholders() {
        let messages = Messages::new(Language::En);
        let text = messages.format(
            "warning_long_tag_msg",
            &[("tag", "#abc"), ("max", "120")],
        );
        assert_eq!(text, "Tag \"#abc\" exceeds 120 chars and was skipped");
    }

    #[test]
    fn test_chinese_templates() {
        let messages = Messages::new(Language::Zh);
        assert_eq!(messages.get("folder"), "文件夹");
        assert_eq!(
            messages.format("error_rename_fail_msg", &[("path", "/a/b")]),
            "找不到：/a/b"
        );
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        let messages = Messages::new(Language::Zh);
        assert_eq!(messages.get("no_such_key"), "no_such_key");
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("EN".parse::<Language>(), Ok(Language::En));
        assert_eq!("zh".parse::<Language>(), Ok(Language::Zh));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_rename_failed_mentions_missing_path() {
        let messages = Messages::default();
        let error = RenameError::RenameTargetMissing {
            path: PathBuf::from("/data/gone.txt"),
        };
        let (title, message) = messages.rename_failed(&error);
        assert_eq!(title, "Rename Error");
        assert_eq!(message, "Cannot find: /data/gone.txt");
    }

    #[test]
    fn test_tag_refused_reports_limit() {
        let messages = Messages::default();
        let error = TagError::TagTooLong {
            tag: "#x".to_string(),
            max: 30,
        };
        let (_, message) = messages.tag_refused(&error);
        assert_eq!(message, "Tags are limited to 30 chars");
    }
}
