/*!
 * projexport - Export a project's file tree and contents into one document
 *
 * This library collects the non-excluded text files of a project, renders
 * its directory structure, and serializes both into Markdown, JSON or
 * plain text.
 */

pub mod clipboard;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod exporter;
pub mod quick;
pub mod report;
pub mod scanner;
pub mod tree;
pub mod types;
pub mod utils;
pub mod writer;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use config::{Config, Settings, SettingsStore};
pub use error::{ExportError, Result};
pub use exclusion::ExclusionSet;
pub use report::ExportReport;
pub use scanner::Scanner;
pub use tree::TreeRenderer;
pub use types::{ExportFormat, FileRecord, QuickFormat, StructureStyle};
pub use writer::DocumentWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
