/*!
 * File collection: count pass and read pass over the project tree
 */

use std::fs;
use std::path::Path;

use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::error::{ExportError, Result};
use crate::exclusion::ExclusionSet;
use crate::types::FileRecord;
use crate::utils::{is_binary, language_for, relative_path};

/// Collects file records under a project root
pub struct Scanner {
    config: Config,
    exclusions: ExclusionSet,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: Config, exclusions: ExclusionSet) -> Self {
        Self { config, exclusions }
    }

    /// Build a scanner with the exclusions derived from `config`
    pub fn from_config(config: Config) -> Result<Self> {
        let exclusions = config.exclusions()?;
        Ok(Self::new(config, exclusions))
    }

    /// Exclusions applied by both passes
    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    /// Walk the root, pruning excluded entries. The root itself is always kept.
    fn walk(&self) -> impl Iterator<Item = walkdir::Result<DirEntry>> + '_ {
        let root = self.config.root.as_path();
        WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let rel = relative_path(root, entry.path());
                let keep = !self.exclusions.is_excluded(&rel, entry.file_type().is_dir());
                if !keep {
                    trace!(path = %rel, "excluded");
                }
                keep
            })
    }

    /// Count non-excluded, non-directory entries
    pub fn count_files(&self) -> Result<u64> {
        let mut total: u64 = 0;
        for entry in self.walk() {
            let entry = entry?;
            if entry.depth() > 0 && !entry.file_type().is_dir() {
                total += 1;
            }
        }
        debug!(total, "count pass finished");
        Ok(total)
    }

    /// Collect all exportable files in traversal order
    ///
    /// `on_progress` receives a percent increment of `100 / total` for every
    /// visited entry, directories included, and nothing when `total` is zero.
    /// `is_cancelled` is polled between the two passes and whenever the
    /// read pass enters a directory.
    pub fn collect<P, C>(&self, mut on_progress: P, is_cancelled: C) -> Result<Vec<FileRecord>>
    where
        P: FnMut(f64),
        C: Fn() -> bool,
    {
        let total = self.count_files()?;
        if is_cancelled() {
            debug!("cancelled after count pass");
            return Err(ExportError::Cancelled);
        }

        let increment = if total == 0 { 0.0 } else { 100.0 / total as f64 };
        let mut done: u64 = 0;
        let mut records = Vec::new();

        for entry in self.walk() {
            let entry = entry?;
            if entry.depth() == 0 {
                continue;
            }

            done += 1;
            if total > 0 {
                on_progress(increment);
            }

            if entry.file_type().is_dir() {
                if is_cancelled() {
                    debug!(done, "cancelled during read pass");
                    return Err(ExportError::Cancelled);
                }
                continue;
            }

            if let Some(record) = self.read_file(entry.path())? {
                records.push(record);
            }
        }

        debug!(done, files = records.len(), "read pass finished");
        Ok(records)
    }

    /// Read one file, or `None` when it is binary or oversized
    fn read_file(&self, path: &Path) -> Result<Option<FileRecord>> {
        let rel = relative_path(&self.config.root, path);
        let metadata = fs::metadata(path)?;

        if metadata.len() > self.config.max_file_size {
            trace!(path = %rel, size = metadata.len(), "skipping oversized file");
            return Ok(None);
        }
        if is_binary(path) {
            trace!(path = %rel, "skipping binary file");
            return Ok(None);
        }

        let bytes = fs::read(path)?;
        Ok(Some(FileRecord {
            content: String::from_utf8_lossy(&bytes).into_owned(),
            language: language_for(path).to_string(),
            size: metadata.len(),
            last_modified: metadata.modified()?,
            path: rel,
        }))
    }
}
