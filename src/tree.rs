/*!
 * Indented structure listing of the project tree
 */

use std::cmp::Ordering;
use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::error::Result;
use crate::exclusion::ExclusionSet;
use crate::types::StructureStyle;
use crate::utils::{is_binary, relative_path};

const DIR_GLYPH: &str = "📁 ";
const FILE_GLYPH: &str = "📄 ";

/// Renders the directory listing shown in the structure section
pub struct TreeRenderer<'a> {
    root: &'a Path,
    exclusions: &'a ExclusionSet,
    style: StructureStyle,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(root: &'a Path, exclusions: &'a ExclusionSet, style: StructureStyle) -> Self {
        Self {
            root,
            exclusions,
            style,
        }
    }

    /// Render the listing as lines, top to bottom
    pub fn lines(&self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        self.render_dir(self.root, &mut Vec::new(), &mut lines)?;
        Ok(lines)
    }

    /// Render the listing joined with newlines
    pub fn render(&self) -> Result<String> {
        Ok(self.lines()?.join("\n"))
    }

    /// `last_flags` holds, per ancestor level, whether that ancestor was the
    /// last entry of its own directory.
    fn render_dir(
        &self,
        dir: &Path,
        last_flags: &mut Vec<bool>,
        lines: &mut Vec<String>,
    ) -> Result<()> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(dir)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1)
            .sort_by(sibling_order)
        {
            let entry = entry?;
            let rel = relative_path(self.root, entry.path());
            if !self.exclusions.is_excluded(&rel, entry.file_type().is_dir()) {
                entries.push(entry);
            }
        }

        let last_idx = entries.len().saturating_sub(1);
        for (idx, entry) in entries.iter().enumerate() {
            let is_last = idx == last_idx;
            let is_dir = entry.file_type().is_dir();
            if !is_dir && is_binary(entry.path()) {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            lines.push(format!(
                "{}{}{}{}",
                self.padding(last_flags),
                self.branch(is_last),
                self.glyph(is_dir),
                name
            ));

            if is_dir {
                last_flags.push(is_last);
                self.render_dir(entry.path(), last_flags, lines)?;
                last_flags.pop();
            }
        }

        Ok(())
    }

    fn padding(&self, last_flags: &[bool]) -> String {
        last_flags
            .iter()
            .map(|&last| match (last, self.style) {
                (true, _) => "    ",
                (false, StructureStyle::Glyph) => "  ",
                (false, StructureStyle::Plain) => "│   ",
            })
            .collect()
    }

    fn branch(&self, is_last: bool) -> &'static str {
        match (self.style, is_last) {
            (StructureStyle::Glyph, _) => "",
            (StructureStyle::Plain, true) => "└── ",
            (StructureStyle::Plain, false) => "├── ",
        }
    }

    fn glyph(&self, is_dir: bool) -> &'static str {
        match (self.style, is_dir) {
            (StructureStyle::Plain, _) => "",
            (StructureStyle::Glyph, true) => DIR_GLYPH,
            (StructureStyle::Glyph, false) => FILE_GLYPH,
        }
    }
}

/// Directories first, then names compared case-insensitively
fn sibling_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    let a_dir = a.file_type().is_dir();
    let b_dir = b.file_type().is_dir();
    b_dir.cmp(&a_dir).then_with(|| {
        let a_name = a.file_name().to_string_lossy();
        let b_name = b.file_name().to_string_lossy();
        a_name
            .to_lowercase()
            .cmp(&b_name.to_lowercase())
            .then_with(|| a_name.cmp(&b_name))
    })
}
