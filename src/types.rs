/*!
 * Core types and data structures for projexport
 */

use std::fmt;
use std::time::SystemTime;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One included file, created by a single collector pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Root-relative path with `/` separators
    pub path: String,
    /// Decoded text content
    pub content: String,
    /// Code fence tag derived from the extension, empty if unknown
    pub language: String,
    /// Size in bytes at read time
    pub size: u64,
    /// Last modification time
    pub last_modified: SystemTime,
}

/// Full export document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Markdown,
    Json,
    Text,
}

impl ExportFormat {
    /// File extension used for the default output path
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Text => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Markdown => "Markdown",
            Self::Json => "JSON",
            Self::Text => "Text",
        })
    }
}

/// Formats available to the quick export path
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QuickFormat {
    Markdown,
    Text,
}

impl fmt::Display for QuickFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Markdown => "Markdown",
            Self::Text => "Text",
        })
    }
}

/// Visual style of the structure listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StructureStyle {
    /// Folder / file pictographs, no branch characters
    #[default]
    #[serde(alias = "emoji")]
    Glyph,
    /// ASCII branch characters, no pictographs
    #[serde(alias = "ascii")]
    Plain,
}
