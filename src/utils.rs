/*!
 * Static tables and small helpers shared by the collector and renderers
 */

use std::collections::HashMap;
use std::path::{Component, Path};

use once_cell::sync::Lazy;

/// Largest file, in bytes, whose content is exported
pub const MAX_FILE_SIZE: u64 = 1_048_576;

/// Built-in exclusion globs, always placed ahead of the user's patterns
pub static DEFAULT_EXCLUSIONS: &[&str] = &[
    // Dependencies & lockfiles
    "**/node_modules/**",
    "**/.yarn/**",
    "**/.npm/**",
    "**/.pnpm-store/**",
    "**/vendor/**",
    "**/*.lock",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    ".pnp.*",
    // Version Control
    "**/.git/**",
    "**/.svn/**",
    "**/.hg/**",
    // Build & Dist
    "**/dist/**",
    "**/build/**",
    "**/out/**",
    "**/bin/**",
    "**/obj/**",
    "**/target/**",
    "**/.next/**",
    "**/.vite/**",
    "**/.turbo/**",
    "**/.parcel-cache/**",
    "**/.svelte-kit/**",
    "**/.webpack/**",
    "**/.rollup.cache/**",
    "**/.cache-loader/**",
    "**/.cache/**",
    // Coverage & reports
    "**/coverage/**",
    "**/.nyc_output/**",
    "**/reports/**",
    // IDEs & Editors
    "**/.vscode/**",
    "**/.idea/**",
    "**/.history/**",
    "**/*.swp",
    "**/*~",
    // Python
    "**/.venv/**",
    "**/env/**",
    "**/venv/**",
    "**/__pycache__/**",
    "**/*.py[cod]",
    "**/*.pyo",
    "**/*.egg-info/**",
    // Native binaries
    "**/*.dll",
    "**/*.exe",
    "**/*.pdb",
    // Generated text
    "**/*.log",
    "**/*.map",
    "**/*.min.js",
    "**/*.min.css",
    // OS Files
    "**/.DS_Store",
    "**/Thumbs.db",
    "**/Icon\r",
];

/// Extensions treated as binary; matched as a case-insensitive suffix
pub static BINARY_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".ico", ".pdf", ".exe", ".dll", ".so", ".dylib", ".bin",
    ".zip", ".tar", ".gz", ".7z", ".rar", ".woff", ".woff2", ".ttf", ".eot", ".mp3", ".mp4",
    ".avi", ".mov", ".sqlite", ".db", ".dat",
];

/// Extension (lowercase, without dot) to code fence tag
static LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("js", "javascript"),
        ("ts", "typescript"),
        ("jsx", "javascript"),
        ("tsx", "typescript"),
        ("py", "python"),
        ("java", "java"),
        ("html", "html"),
        ("css", "css"),
        ("scss", "scss"),
        ("json", "json"),
        ("md", "markdown"),
        ("xml", "xml"),
        ("yaml", "yaml"),
        ("yml", "yaml"),
        ("sh", "shell"),
        ("bash", "shell"),
        ("php", "php"),
        ("rb", "ruby"),
        ("go", "go"),
        ("rs", "rust"),
        ("cpp", "cpp"),
        ("c", "c"),
        ("cs", "csharp"),
        ("vue", "vue"),
        ("svelte", "svelte"),
        ("sql", "sql"),
        ("graphql", "graphql"),
        ("proto", "protobuf"),
    ])
});

/// Whether the file name ends with one of the binary extensions
pub fn is_binary(path: &Path) -> bool {
    let lower = path.to_string_lossy().to_lowercase();
    BINARY_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Language tag for a path, empty if the extension is unknown
pub fn language_for(path: &Path) -> &'static str {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .and_then(|ext| LANGUAGES.get(ext.as_str()).copied())
        .unwrap_or("")
}

/// Path of `path` relative to `root`, joined with `/`
///
/// Returns an empty string for the root itself.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
