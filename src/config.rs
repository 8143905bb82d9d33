/*!
 * Configuration handling for projexport
 */

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::exclusion::ExclusionSet;
use crate::types::{ExportFormat, QuickFormat, StructureStyle};
use crate::utils::{relative_path, MAX_FILE_SIZE};
use crate::{bail, ensure};

/// Name of the settings file kept at the workspace root
pub const SETTINGS_FILE: &str = ".projexport.json";

/// Command-line arguments for projexport
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "projexport",
    version = env!("CARGO_PKG_VERSION"),
    about = "Export a project's file tree and contents into one document",
    long_about = "Collects every non-excluded text file of a project, renders its directory structure, and writes both into a single Markdown, JSON or plain text document."
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Export the whole project into a document
    Export(ExportArgs),

    /// Copy one file, or a range of its lines, to the clipboard
    Quick(QuickArgs),

    /// Add a custom exclusion pattern to the stored settings
    Exclude(ExcludeArgs),

    /// Show the settings file and its current values
    Settings(WorkspaceArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[clap(value_enum)]
        shell: Shell,
    },
}

/// Location of the workspace and its settings file
#[derive(Args, Debug, Clone)]
pub struct WorkspaceArgs {
    /// Workspace root
    #[clap(long, default_value = ".")]
    pub root: PathBuf,

    /// Settings file (defaults to <ROOT>/.projexport.json)
    #[clap(long)]
    pub settings: Option<PathBuf>,
}

impl WorkspaceArgs {
    /// Settings store for this workspace
    pub fn store(&self) -> SettingsStore {
        match &self.settings {
            Some(path) => SettingsStore::new(path.clone()),
            None => SettingsStore::for_root(&self.root),
        }
    }
}

/// Arguments of the `export` command
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Project root to export
    #[clap(default_value = ".")]
    pub root: PathBuf,

    /// Output format
    #[clap(short, long, value_enum, default_value = "markdown")]
    pub format: ExportFormat,

    /// Output file (defaults to <ROOT>/project-export.<ext>)
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Structure listing style, overrides the stored setting
    #[clap(long, value_enum)]
    pub style: Option<StructureStyle>,

    /// Comma-separated exclusion patterns added for this run only
    #[clap(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Settings file (defaults to <ROOT>/.projexport.json)
    #[clap(long)]
    pub settings: Option<PathBuf>,
}

/// Arguments of the `quick` command
#[derive(Args, Debug, Clone)]
pub struct QuickArgs {
    /// File to export
    pub file: PathBuf,

    /// Output format
    #[clap(short, long, value_enum, default_value = "markdown")]
    pub format: QuickFormat,

    /// Only export this 1-based inclusive line range, as START:END
    #[clap(long)]
    pub lines: Option<String>,

    /// Print to stdout instead of copying to the clipboard
    #[clap(long)]
    pub print: bool,
}

/// Arguments of the `exclude` command
#[derive(Args, Debug, Clone)]
pub struct ExcludeArgs {
    /// Glob pattern to exclude
    pub pattern: String,

    #[clap(flatten)]
    pub workspace: WorkspaceArgs,
}

/// Persisted user settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// User exclusion globs, appended to the built-in list
    pub custom_exclusions: Vec<String>,
    /// Structure listing style
    pub structure_style: StructureStyle,
}

/// Result of adding an exclusion pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
}

/// JSON file backed settings storage
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default location inside `root`
    pub fn for_root(root: &Path) -> Self {
        Self::new(root.join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json + "\n")?;
        Ok(())
    }

    /// Append `pattern` unless it is already stored
    pub fn add_exclusion(&self, pattern: &str) -> Result<AddOutcome> {
        ensure!(
            !pattern.trim().is_empty(),
            InvalidArgument,
            "exclusion pattern must not be empty"
        );

        let mut settings = self.load()?;
        if settings.custom_exclusions.iter().any(|p| p == pattern) {
            return Ok(AddOutcome::AlreadyExists);
        }

        // Reject patterns that would break every later export
        ExclusionSet::from_patterns(vec![pattern.to_string()])?;

        settings.custom_exclusions.push(pattern.to_string());
        self.save(&settings)?;
        Ok(AddOutcome::Added)
    }
}

/// Configuration of one export run
#[derive(Clone, Debug)]
pub struct Config {
    /// Project root
    pub root: PathBuf,

    /// User exclusion patterns, appended to the defaults
    pub custom_exclusions: Vec<String>,

    /// Structure listing style
    pub structure_style: StructureStyle,

    /// Largest file whose content is exported
    pub max_file_size: u64,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            custom_exclusions: Vec::new(),
            structure_style: StructureStyle::default(),
            max_file_size: MAX_FILE_SIZE,
        }
    }

    /// Merge stored settings with the per-run overrides of `export`
    pub fn from_export_args(args: &ExportArgs, settings: Settings) -> Self {
        let mut custom_exclusions = settings.custom_exclusions;
        custom_exclusions.extend(args.exclude.iter().cloned());

        Self {
            root: args.root.clone(),
            custom_exclusions,
            structure_style: args.style.unwrap_or(settings.structure_style),
            max_file_size: MAX_FILE_SIZE,
        }
    }

    /// Exclude `path` from this run when it lies inside the root
    ///
    /// The root and the parent of `path` are canonicalized so that `.`,
    /// relative and absolute spellings agree; `path` itself need not exist.
    /// Returns whether an exclusion was added.
    pub fn exclude_path(&mut self, path: &Path) -> Result<bool> {
        let Some(name) = path.file_name() else {
            return Ok(false);
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let Ok(parent) = fs::canonicalize(parent) else {
            return Ok(false);
        };
        let root = fs::canonicalize(&self.root)?;

        let full = parent.join(name);
        if !full.starts_with(&root) {
            return Ok(false);
        }
        let rel = relative_path(&root, &full);
        debug!(path = %rel, "excluded for this run");
        self.custom_exclusions.push(globset::escape(&rel));
        Ok(true)
    }

    /// Defaults plus custom exclusions
    pub fn exclusions(&self) -> Result<ExclusionSet> {
        ExclusionSet::new(&self.custom_exclusions)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.root.is_dir() {
            bail!(
                NoWorkspace,
                "root directory not found: {}",
                self.root.display()
            );
        }
        ensure!(
            self.max_file_size > 0,
            Config,
            "maximum file size must be positive"
        );
        Ok(())
    }
}

/// Default output path for `format` inside `root`
pub fn default_output(root: &Path, format: ExportFormat) -> PathBuf {
    root.join(format!("project-export.{}", format.extension()))
}

/// Validate an output destination
pub fn validate_output(output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            bail!(
                Config,
                "output directory not found: {}",
                parent.display()
            );
        }
    }
    Ok(())
}
