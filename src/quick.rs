/*!
 * Quick export of a single file or a selection of its lines
 */

use std::fs;
use std::path::{Path, PathBuf};

use crate::clipboard::ClipboardSink;
use crate::error::Result;
use crate::types::QuickFormat;
use crate::utils::language_for;
use crate::{bail, ensure};

/// 1-based inclusive line range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    /// Parse `START:END`, or a single line number
    pub fn parse(input: &str) -> Result<Self> {
        let (start, end) = match input.split_once(':') {
            Some((start, end)) => (start.trim(), end.trim()),
            None => (input.trim(), input.trim()),
        };
        let (Ok(start), Ok(end)) = (start.parse::<usize>(), end.parse::<usize>()) else {
            bail!(InvalidArgument, "invalid line range: {}", input);
        };
        ensure!(
            start >= 1 && start <= end,
            InvalidArgument,
            "invalid line range: {}",
            input
        );
        Ok(Self { start, end })
    }
}

/// One open document and an optional selection within it
#[derive(Debug, Clone)]
pub struct QuickSource {
    /// Path shown in the header
    pub path: PathBuf,
    /// Full document text
    pub text: String,
    /// Selected text, if any
    pub selection: Option<String>,
}

impl QuickSource {
    /// Load `path`, selecting `range` when given
    pub fn load(path: &Path, range: Option<LineRange>) -> Result<Self> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let selection = range.map(|r| select_lines(&text, r));
        Ok(Self {
            path: path.to_path_buf(),
            text,
            selection,
        })
    }

    /// The selection when non-empty, otherwise the whole document
    pub fn body(&self) -> &str {
        match &self.selection {
            Some(selected) if !selected.is_empty() => selected,
            _ => &self.text,
        }
    }

    /// Render the clipboard text
    pub fn render(&self, format: QuickFormat) -> String {
        let path = self.path.display();
        let body = self.body();
        match format {
            QuickFormat::Text => format!("FILE: {}\n\n{}", path, body),
            QuickFormat::Markdown => format!(
                "# Quick Export\n\n## {}\n\n```{}\n{}\n```",
                path,
                language_for(&self.path),
                body
            ),
        }
    }

    /// Render and hand the text to `sink`, returning what was copied
    pub fn copy_to(&self, format: QuickFormat, sink: &dyn ClipboardSink) -> Result<String> {
        let text = self.render(format);
        sink.copy(&text)?;
        Ok(text)
    }
}

/// Lines `range` of `text` with their original terminators; empty past the end
fn select_lines(text: &str, range: LineRange) -> String {
    text.split_inclusive('\n')
        .skip(range.start - 1)
        .take(range.end - range.start + 1)
        .collect()
}
