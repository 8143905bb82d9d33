/*!
 * Reporting functionality for projexport
 *
 * Renders the summary shown after an export with the tabled library.
 */

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::{ExportFormat, FileRecord};
use crate::utils::format_file_size;

/// Statistics of a finished export
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Output file path
    pub output_file: String,
    /// Document format
    pub format: ExportFormat,
    /// Time taken to collect and render
    pub duration: Duration,
    /// Number of exported files
    pub files: usize,
    /// Sum of exported file sizes
    pub total_bytes: u64,
    /// Exported files per language tag, untagged files under "other"
    pub languages: BTreeMap<String, usize>,
}

impl ExportReport {
    pub fn new(output: &Path, format: ExportFormat, files: &[FileRecord], duration: Duration) -> Self {
        let mut languages = BTreeMap::new();
        for file in files {
            let tag = if file.language.is_empty() {
                "other"
            } else {
                file.language.as_str()
            };
            *languages.entry(tag.to_string()).or_insert(0) += 1;
        }

        Self {
            output_file: output.display().to_string(),
            format,
            duration,
            files: files.len(),
            total_bytes: files.iter().map(|f| f.size).sum(),
            languages,
        }
    }

    /// Headline shown once the document is written
    pub fn headline(&self) -> String {
        format!("Project exported ({} files)", self.files)
    }

    fn summary_table(&self) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: String,
        }

        let rows = vec![
            SummaryRow {
                key: "📂 Output File",
                value: self.output_file.clone(),
            },
            SummaryRow {
                key: "📝 Format",
                value: self.format.to_string(),
            },
            SummaryRow {
                key: "📄 Files Exported",
                value: self.files.to_string(),
            },
            SummaryRow {
                key: "📦 Total Size",
                value: format_file_size(self.total_bytes),
            },
            SummaryRow {
                key: "⏱️ Process Time",
                value: format!("{:.4?}", self.duration),
            },
        ];

        styled(Table::new(rows))
    }

    fn languages_table(&self) -> String {
        #[derive(Tabled)]
        struct LanguageRow<'a> {
            #[tabled(rename = "Language")]
            language: &'a str,

            #[tabled(rename = "Files")]
            files: usize,
        }

        let mut rows: Vec<LanguageRow> = self
            .languages
            .iter()
            .map(|(language, &files)| LanguageRow { language, files })
            .collect();
        rows.sort_by(|a, b| b.files.cmp(&a.files).then(a.language.cmp(b.language)));

        styled(Table::new(rows))
    }

    /// Full console report
    pub fn render(&self) -> String {
        let mut out = format!("✅  {}\n{}", self.headline(), self.summary_table());
        if !self.languages.is_empty() {
            out.push_str("\n\n📋  FILES BY LANGUAGE\n");
            out.push_str(&self.languages_table());
        }
        out
    }
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));
    table.to_string()
}
