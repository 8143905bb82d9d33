/*!
 * Glob based exclusion rules
 */

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::Result;
use crate::utils::DEFAULT_EXCLUSIONS;

/// Built-in patterns followed by user patterns, compiled into one matcher
///
/// Matching is case-insensitive, `*` stops at `/`, `**` spans any number of
/// segments and dot-files get no special treatment.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    patterns: Vec<String>,
    matcher: GlobSet,
}

impl ExclusionSet {
    /// Build the set from the defaults plus `custom`
    pub fn new<S: AsRef<str>>(custom: &[S]) -> Result<Self> {
        let patterns = DEFAULT_EXCLUSIONS
            .iter()
            .map(|p| p.to_string())
            .chain(custom.iter().map(|p| p.as_ref().to_string()))
            .collect();
        Self::from_patterns(patterns)
    }

    /// Build the set from exactly `patterns`, without the defaults
    pub fn from_patterns(patterns: Vec<String>) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            builder.add(compile(pattern)?);
            // `dir/**` also matches `dir` itself, file or directory
            if let Some(bare) = pattern.strip_suffix("/**").filter(|b| !b.is_empty()) {
                builder.add(compile(bare)?);
            }
        }

        Ok(Self {
            patterns,
            matcher: builder.build()?,
        })
    }

    /// Patterns in insertion order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Test a root-relative, `/`-separated path
    pub fn is_match(&self, rel_path: &str) -> bool {
        self.matcher.is_match(rel_path)
    }

    /// Whether an entry should be left out of the export
    ///
    /// Directories are also tested with a trailing `/` so that patterns such
    /// as `**/node_modules/**` prune the directory itself.
    pub fn is_excluded(&self, rel_path: &str, is_dir: bool) -> bool {
        if rel_path.is_empty() {
            return false;
        }
        if self.is_match(rel_path) {
            return true;
        }
        is_dir && self.is_match(&format!("{}/", rel_path))
    }
}

fn compile(pattern: &str) -> Result<Glob> {
    Ok(GlobBuilder::new(pattern)
        .case_insensitive(true)
        .literal_separator(true)
        .backslash_escape(true)
        .build()?)
}
