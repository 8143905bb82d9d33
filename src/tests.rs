/*!
 * Tests for the collection and rendering pipeline
 */

use std::cell::Cell;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use filetime::{set_file_mtime, FileTime};
use tempfile::tempdir;

use crate::config::{default_output, Config, SettingsStore, SETTINGS_FILE};
use crate::error::ExportError;
use crate::exclusion::ExclusionSet;
use crate::exporter;
use crate::scanner::Scanner;
use crate::tree::TreeRenderer;
use crate::types::{ExportFormat, StructureStyle};
use crate::utils::MAX_FILE_SIZE;
use crate::writer::{DocumentWriter, JsonExport};

fn write_file(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(content)?;
    Ok(())
}

// Small project with dependency and VCS directories next to the sources
fn setup_project() -> io::Result<tempfile::TempDir> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();

    write_file(&root.join("src").join("index.ts"), b"hello")?;
    write_file(&root.join("node_modules").join("pkg").join("index.js"), b"module")?;
    write_file(&root.join(".git").join("HEAD"), b"ref: refs/heads/main")?;

    Ok(temp_dir)
}

fn scanner_for(root: &Path, custom: &[&str]) -> Scanner {
    let mut config = Config::new(root);
    config.custom_exclusions = custom.iter().map(|p| p.to_string()).collect();
    Scanner::from_config(config).unwrap()
}

fn collect(scanner: &Scanner) -> Vec<crate::types::FileRecord> {
    scanner.collect(|_| {}, || false).unwrap()
}

#[test]
fn test_default_exclusions_example() -> io::Result<()> {
    let temp_dir = setup_project()?;
    let scanner = scanner_for(temp_dir.path(), &[]);

    let files = collect(&scanner);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "src/index.ts");
    assert_eq!(files[0].content, "hello");
    assert_eq!(files[0].language, "typescript");
    assert_eq!(files[0].size, 5);

    let tree = TreeRenderer::new(temp_dir.path(), scanner.exclusions(), StructureStyle::Plain)
        .lines()
        .unwrap();
    assert_eq!(tree, ["└── src", "    └── index.ts"]);
    assert!(!tree.iter().any(|l| l.contains("node_modules") || l.contains(".git")));

    Ok(())
}

#[test]
fn test_size_boundary() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(&root.join("exact.txt"), &vec![b'a'; MAX_FILE_SIZE as usize])?;
    write_file(&root.join("over.txt"), &vec![b'a'; MAX_FILE_SIZE as usize + 1])?;

    let files = collect(&scanner_for(root, &[]));
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "exact.txt");
    assert_eq!(files[0].size, 1_048_576);

    Ok(())
}

#[test]
fn test_binary_files_are_skipped_but_counted() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(&root.join("logo.PNG"), &[0x89, b'P', b'N', b'G'])?;
    write_file(&root.join("main.rs"), b"fn main() {}")?;

    let scanner = scanner_for(root, &[]);
    assert_eq!(scanner.count_files().unwrap(), 2);

    let files = collect(&scanner);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "main.rs");

    let tree = TreeRenderer::new(root, scanner.exclusions(), StructureStyle::Glyph)
        .render()
        .unwrap();
    assert_eq!(tree, "📄 main.rs");

    Ok(())
}

#[test]
fn test_excluded_directories_are_pruned() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(&root.join("generated").join("keep.rs"), b"// keep?")?;
    write_file(&root.join("generated").join("deep").join("api.rs"), b"// api")?;
    write_file(&root.join("lib.rs"), b"pub mod api;")?;

    // Pattern only matches the directory form, descendants are dropped with it
    let scanner = scanner_for(root, &["generated/"]);
    assert_eq!(scanner.count_files().unwrap(), 1);

    let files = collect(&scanner);
    let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, ["lib.rs"]);

    let tree = TreeRenderer::new(root, scanner.exclusions(), StructureStyle::Plain)
        .lines()
        .unwrap();
    assert_eq!(tree, ["└── lib.rs"]);

    Ok(())
}

#[test]
fn test_progress_reports_every_entry() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(&root.join("a.txt"), b"a")?;
    write_file(&root.join("docs").join("b.md"), b"b")?;
    write_file(&root.join("docs").join("c.md"), b"c")?;
    write_file(&root.join("docs").join("big.bin"), b"\0")?;

    let scanner = scanner_for(root, &[]);
    let mut increments = Vec::new();
    let files = scanner.collect(|inc| increments.push(inc), || false).unwrap();

    // 4 files counted; 5 entries visited including the directory
    assert_eq!(files.len(), 3);
    assert_eq!(increments.len(), 5);
    assert!(increments.iter().all(|&inc| (inc - 25.0).abs() < f64::EPSILON));

    Ok(())
}

#[test]
fn test_empty_tree_reports_no_progress() -> io::Result<()> {
    let temp_dir = tempdir()?;
    fs::create_dir(temp_dir.path().join("empty"))?;

    let scanner = scanner_for(temp_dir.path(), &[]);
    let mut calls = 0;
    let files = scanner.collect(|_| calls += 1, || false).unwrap();

    assert!(files.is_empty());
    assert_eq!(calls, 0);

    Ok(())
}

#[test]
fn test_cancellation_between_passes() -> io::Result<()> {
    let temp_dir = setup_project()?;
    let scanner = scanner_for(temp_dir.path(), &[]);

    let polls = Cell::new(0);
    let result = scanner.collect(
        |_| {},
        || {
            polls.set(polls.get() + 1);
            true
        },
    );

    assert!(matches!(result, Err(ExportError::Cancelled)));
    assert_eq!(polls.get(), 1);

    Ok(())
}

#[test]
fn test_cancelled_export_writes_nothing() -> io::Result<()> {
    let temp_dir = setup_project()?;
    let config = Config::new(temp_dir.path());

    let result = exporter::run(&config, ExportFormat::Markdown, |_| {}, || true);
    assert!(matches!(result, Err(ExportError::Cancelled)));
    assert!(!temp_dir.path().join("project-export.md").exists());

    Ok(())
}

#[test]
fn test_missing_root_fails_before_traversal() {
    let temp_dir = tempdir().unwrap();
    let config = Config::new(temp_dir.path().join("nope"));

    let result = exporter::run(&config, ExportFormat::Text, |_| {}, || false);
    assert!(matches!(result, Err(ExportError::NoWorkspace(_))));
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_fails_export() -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempdir()?;
    let locked = temp_dir.path().join("locked");
    write_file(&locked.join("secret.txt"), b"s")?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

    // Root ignores permission bits, so only assert when the lock holds
    let locked_for_us = fs::read_dir(&locked).is_err();
    let result = collect_result(temp_dir.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;

    if locked_for_us {
        assert!(result.is_err());
    }
    Ok(())
}

fn collect_result(root: &Path) -> crate::error::Result<Vec<crate::types::FileRecord>> {
    scanner_for(root, &[]).collect(|_| {}, || false)
}

#[test]
fn test_collector_and_tree_orders_may_differ() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(&root.join("b.txt"), b"b")?;
    write_file(&root.join("a").join("z.txt"), b"z")?;
    write_file(&root.join("A.txt"), b"A")?;

    let scanner = scanner_for(root, &[]);
    let files = collect(&scanner);
    let mut paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
    paths.sort();
    assert_eq!(paths, ["A.txt", "a/z.txt", "b.txt"]);

    // The listing is always directories first, then case-insensitive names
    let tree = TreeRenderer::new(root, scanner.exclusions(), StructureStyle::Plain)
        .lines()
        .unwrap();
    assert_eq!(tree, ["├── a", "│   └── z.txt", "├── A.txt", "└── b.txt"]);

    Ok(())
}

#[test]
fn test_repeated_export_is_identical() -> io::Result<()> {
    let temp_dir = setup_project()?;
    write_file(&temp_dir.path().join("README.md"), b"# readme\n")?;
    let config = Config::new(temp_dir.path());

    for format in [ExportFormat::Markdown, ExportFormat::Text] {
        let first = exporter::run(&config, format, |_| {}, || false).unwrap();
        let second = exporter::run(&config, format, |_| {}, || false).unwrap();
        assert_eq!(first.document, second.document);
    }

    let first = exporter::run(&config, ExportFormat::Json, |_| {}, || false).unwrap();
    let second = exporter::run(&config, ExportFormat::Json, |_| {}, || false).unwrap();
    let mut first: JsonExport = serde_json::from_str(&first.document).unwrap();
    let mut second: JsonExport = serde_json::from_str(&second.document).unwrap();
    first.exported_at.clear();
    second.exported_at.clear();
    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_json_round_trip_from_disk() -> io::Result<()> {
    let temp_dir = setup_project()?;
    let root = temp_dir.path();
    write_file(&root.join("docs").join("guide.md"), "ünïcode \"quotes\"\n".as_bytes())?;
    set_file_mtime(
        root.join("docs").join("guide.md"),
        FileTime::from_unix_time(1_700_000_000, 0),
    )?;

    let scanner = scanner_for(root, &[]);
    let files = collect(&scanner);
    let tree = TreeRenderer::new(root, scanner.exclusions(), StructureStyle::Glyph)
        .render()
        .unwrap();
    let doc = DocumentWriter::new(ExportFormat::Json)
        .render(&files, &tree)
        .unwrap();

    let parsed: JsonExport = serde_json::from_str(&doc).unwrap();
    assert_eq!(parsed.structure, tree);
    assert_eq!(parsed.files.len(), files.len());
    for (json, file) in parsed.files.iter().zip(&files) {
        assert_eq!(json.path, file.path);
        assert_eq!(json.content, file.content);
        assert_eq!(json.language, file.language);
        assert_eq!(json.size, file.size);
    }

    let guide = files.iter().find(|f| f.path == "docs/guide.md").unwrap();
    assert_eq!(guide.last_modified, UNIX_EPOCH + Duration::from_secs(1_700_000_000));
    let json_guide = parsed.files.iter().find(|f| f.path == "docs/guide.md").unwrap();
    assert_eq!(json_guide.last_modified, "2023-11-14T22:13:20.000Z");

    Ok(())
}

#[test]
fn test_invalid_utf8_is_replaced() -> io::Result<()> {
    let temp_dir = tempdir()?;
    write_file(&temp_dir.path().join("latin1.txt"), &[b'c', b'a', b'f', 0xE9])?;

    let files = collect(&scanner_for(temp_dir.path(), &[]));
    assert_eq!(files[0].content, "caf\u{FFFD}");
    assert_eq!(files[0].size, 4);

    Ok(())
}

#[test]
fn test_custom_patterns_are_case_insensitive() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_file(&root.join("Notes.BAK"), b"old")?;
    write_file(&root.join("Secrets").join("key.txt"), b"k")?;
    write_file(&root.join("keep.txt"), b"k")?;

    let scanner = scanner_for(root, &["**/*.bak", "secrets/**"]);
    let paths: Vec<_> = collect(&scanner).into_iter().map(|f| f.path).collect();
    assert_eq!(paths, ["keep.txt"]);

    Ok(())
}

#[test]
fn test_exclusion_set_shared_by_both_passes() {
    let set = ExclusionSet::new(&["**/*.md"]).unwrap();
    assert!(set.is_excluded("docs/README.MD", false));
}

#[test]
fn test_previous_export_is_not_reexported() -> io::Result<()> {
    let temp_dir = setup_project()?;
    let root = temp_dir.path();
    let output = default_output(root, ExportFormat::Markdown);
    exporter::run(&Config::new(root), ExportFormat::Markdown, |_| {}, || false)
        .unwrap()
        .save(&output)
        .unwrap();

    // Root and output spelled differently
    let mut config = Config::new(root.join("src").join(".."));
    assert!(config.exclude_path(&output).unwrap());

    let export = exporter::run(&config, ExportFormat::Markdown, |_| {}, || false).unwrap();
    let paths: Vec<_> = export.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, ["src/index.ts"]);
    assert!(!export.document.contains("project-export.md"));

    Ok(())
}

#[test]
fn test_settings_file_is_not_exported() -> io::Result<()> {
    let temp_dir = setup_project()?;
    let root = temp_dir.path();
    let store = SettingsStore::for_root(root);
    store.add_exclusion("**/*.log").unwrap();
    write_file(&root.join("debug.log"), b"noise")?;

    let mut config = Config::new(root);
    config.custom_exclusions = store.load().unwrap().custom_exclusions;
    assert!(config.exclude_path(store.path()).unwrap());

    let export = exporter::run(&config, ExportFormat::Text, |_| {}, || false).unwrap();
    let paths: Vec<_> = export.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, ["src/index.ts"]);
    assert!(!export.document.contains(SETTINGS_FILE));

    Ok(())
}
