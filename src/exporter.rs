/*!
 * One full export: collect files, render the structure, render the document
 */

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::scanner::Scanner;
use crate::tree::TreeRenderer;
use crate::types::{ExportFormat, FileRecord};
use crate::writer::DocumentWriter;

/// Everything produced by one export, before it is persisted
#[derive(Debug, Clone)]
pub struct Export {
    pub format: ExportFormat,
    pub files: Vec<FileRecord>,
    pub structure: String,
    pub document: String,
    pub duration: Duration,
}

impl Export {
    /// Write the document to `output`
    pub fn save(&self, output: &Path) -> Result<()> {
        fs::write(output, &self.document)?;
        info!(output = %output.display(), bytes = self.document.len(), "export written");
        Ok(())
    }
}

/// Run an export over `config.root`
///
/// Nothing is written here; a cancelled or failed run leaves no output.
pub fn run<P, C>(
    config: &Config,
    format: ExportFormat,
    on_progress: P,
    is_cancelled: C,
) -> Result<Export>
where
    P: FnMut(f64),
    C: Fn() -> bool,
{
    config.validate()?;
    let start = Instant::now();

    let scanner = Scanner::from_config(config.clone())?;
    let files = scanner.collect(on_progress, is_cancelled)?;

    let structure =
        TreeRenderer::new(&config.root, scanner.exclusions(), config.structure_style).render()?;
    let document = DocumentWriter::new(format).render(&files, &structure)?;

    info!(files = files.len(), %format, "export rendered");
    Ok(Export {
        format,
        files,
        structure,
        document,
        duration: start.elapsed(),
    })
}
