/*!
 * Document rendering for the Markdown, JSON and text formats
 */

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{ExportFormat, FileRecord};

/// Width of the rule closing every file in the text format
const TEXT_RULE_WIDTH: usize = 40;

/// JSON shape of an export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonExport {
    pub exported_at: String,
    pub structure: String,
    pub files: Vec<JsonFile>,
}

/// JSON shape of one file record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonFile {
    pub path: String,
    pub content: String,
    pub language: String,
    pub size: u64,
    pub last_modified: String,
}

impl From<&FileRecord> for JsonFile {
    fn from(file: &FileRecord) -> Self {
        Self {
            path: file.path.clone(),
            content: file.content.clone(),
            language: file.language.clone(),
            size: file.size,
            last_modified: timestamp(file.last_modified),
        }
    }
}

/// UTC RFC 3339 with milliseconds, e.g. `2024-05-01T12:00:00.000Z`
pub fn timestamp(time: impl Into<DateTime<Utc>>) -> String {
    time.into().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serializes collected files and the structure listing into one document
pub struct DocumentWriter {
    format: ExportFormat,
}

impl DocumentWriter {
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }

    /// Render the document, stamping JSON output with the current time
    pub fn render(&self, files: &[FileRecord], tree: &str) -> Result<String> {
        self.render_at(files, tree, SystemTime::now())
    }

    /// Render the document with an explicit export time
    pub fn render_at(
        &self,
        files: &[FileRecord],
        tree: &str,
        exported_at: SystemTime,
    ) -> Result<String> {
        match self.format {
            ExportFormat::Json => render_json(files, tree, exported_at),
            ExportFormat::Text => Ok(render_text(files, tree)),
            ExportFormat::Markdown => Ok(render_markdown(files, tree)),
        }
    }
}

fn render_json(files: &[FileRecord], tree: &str, exported_at: SystemTime) -> Result<String> {
    let export = JsonExport {
        exported_at: timestamp(exported_at),
        structure: tree.to_string(),
        files: files.iter().map(JsonFile::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

fn render_text(files: &[FileRecord], tree: &str) -> String {
    let rule = "=".repeat(TEXT_RULE_WIDTH);
    let mut lines: Vec<&str> = vec!["PROJECT EXPORT", "", "STRUCTURE", "", tree, "", "FILES", ""];

    let headers: Vec<String> = files.iter().map(|f| format!("=== {} ===", f.path)).collect();
    for (file, header) in files.iter().zip(&headers) {
        lines.extend([header.as_str(), "", file.content.as_str(), "", rule.as_str(), ""]);
    }

    lines.join("\n")
}

fn render_markdown(files: &[FileRecord], tree: &str) -> String {
    let mut lines: Vec<String> = [
        "# Project Export",
        "",
        "## Structure",
        "",
        "```",
        tree,
        "```",
        "",
        "## Files",
        "",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    for file in files {
        lines.push(format!("### {}", file.path));
        lines.push(format!("Last modified: {}", timestamp(file.last_modified)));
        lines.push(format!("Size: {:.2} KB", file.size as f64 / 1024.0));
        lines.push(String::new());
        lines.push(format!("```{}", file.language));
        lines.push(file.content.clone());
        lines.push("```".to_string());
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn record(path: &str, content: &str, language: &str) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            content: content.to_string(),
            language: language.to_string(),
            size: content.len() as u64,
            last_modified: UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        }
    }

    #[test]
    fn test_timestamp_format() {
        let time = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        assert_eq!(timestamp(time), "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn test_text_layout() {
        let files = [record("src/a.rs", "fn a() {}", "rust")];
        let doc = DocumentWriter::new(ExportFormat::Text)
            .render(&files, "└── src\n    └── a.rs")
            .unwrap();

        let expected = format!(
            "PROJECT EXPORT\n\nSTRUCTURE\n\n└── src\n    └── a.rs\n\nFILES\n\n=== src/a.rs ===\n\nfn a() {{}}\n\n{}\n",
            "=".repeat(40)
        );
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_markdown_layout() {
        let files = [
            record("src/a.rs", "fn a() {}", "rust"),
            record("LICENSE", &"x".repeat(2560), ""),
        ];
        let doc = DocumentWriter::new(ExportFormat::Markdown)
            .render(&files, "tree")
            .unwrap();

        assert!(doc.starts_with("# Project Export\n\n## Structure\n\n```\ntree\n```\n\n## Files\n\n"));
        assert!(doc.contains(
            "### src/a.rs\nLast modified: 2023-11-14T22:13:20.000Z\nSize: 0.01 KB\n\n```rust\nfn a() {}\n```\n"
        ));
        assert!(doc.contains("### LICENSE\n"));
        assert!(doc.contains("Size: 2.50 KB\n\n```\nxxx"));
        assert!(doc.ends_with("```\n"));
    }

    #[test]
    fn test_empty_file_list() {
        let doc = DocumentWriter::new(ExportFormat::Text)
            .render(&[], "")
            .unwrap();
        assert_eq!(doc, "PROJECT EXPORT\n\nSTRUCTURE\n\n\n\nFILES\n");
    }

    #[test]
    fn test_json_recovers_records() {
        let files = [
            record("src/a.rs", "fn a() {}\n", "rust"),
            record("notes/todo.txt", "line \"quoted\"\n\ttab", ""),
        ];
        let exported_at = UNIX_EPOCH + Duration::from_secs(1_700_000_100);
        let doc = DocumentWriter::new(ExportFormat::Json)
            .render_at(&files, "tree\nlines", exported_at)
            .unwrap();

        let parsed: JsonExport = serde_json::from_str(&doc).unwrap();
        assert_eq!(parsed.exported_at, "2023-11-14T22:15:00.000Z");
        assert_eq!(parsed.structure, "tree\nlines");
        assert_eq!(parsed.files.len(), 2);
        for (json, file) in parsed.files.iter().zip(&files) {
            assert_eq!(json.path, file.path);
            assert_eq!(json.content, file.content);
            assert_eq!(json.language, file.language);
            assert_eq!(json.size, file.size);
            assert_eq!(json.last_modified, "2023-11-14T22:13:20.000Z");
        }
    }

    #[test]
    fn test_json_key_order() {
        let files = [record("a.md", "a", "markdown")];
        let doc = DocumentWriter::new(ExportFormat::Json)
            .render_at(&files, "", UNIX_EPOCH)
            .unwrap();

        let keys = ["\"exportedAt\"", "\"structure\"", "\"files\"", "\"path\"", "\"content\"", "\"language\"", "\"size\"", "\"lastModified\""];
        let positions: Vec<usize> = keys.iter().map(|k| doc.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(doc.starts_with("{\n  \"exportedAt\": \"1970-01-01T00:00:00.000Z\""));
    }
}
