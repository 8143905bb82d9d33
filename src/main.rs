/*!
 * Command-line interface for projexport
 */

use std::io;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use projexport::clipboard::SystemClipboard;
use projexport::config::{
    default_output, validate_output, AddOutcome, Cli, Command, Config, ExcludeArgs, ExportArgs,
    QuickArgs, SettingsStore, WorkspaceArgs,
};
use projexport::error::{ExportError, Result};
use projexport::exporter;
use projexport::quick::{LineRange, QuickSource};
use projexport::report::ExportReport;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Export(args) => export(args),
        Command::Quick(args) => quick(args),
        Command::Exclude(args) => exclude(args),
        Command::Settings(args) => settings(args),
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "projexport", &mut io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("projexport={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn export(args: ExportArgs) -> Result<()> {
    let store = match &args.settings {
        Some(path) => SettingsStore::new(path.clone()),
        None => SettingsStore::for_root(&args.root),
    };
    let mut config = Config::from_export_args(&args, store.load()?);
    config.validate()?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&config.root, args.format));
    validate_output(&output)?;

    // Never export a previous run's document or the tool's own settings
    config.exclude_path(&output)?;
    config.exclude_path(store.path())?;

    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = Arc::clone(&cancelled);
        if let Err(e) = ctrlc::set_handler(move || cancelled.store(true, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    let progress = ProgressBar::new(100);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}% {wide_msg:.dim.white}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.enable_steady_tick(std::time::Duration::from_millis(100));
    progress.set_prefix("📊 Exporting");
    progress.set_message(format!("📂 {}", config.root.display()));

    let mut percent = 0.0_f64;
    let result = exporter::run(
        &config,
        args.format,
        |increment| {
            percent += increment;
            progress.set_position(percent.min(100.0) as u64);
        },
        || cancelled.load(Ordering::SeqCst),
    );
    progress.finish_and_clear();

    let export = match result {
        Ok(export) => export,
        Err(ExportError::Cancelled) => {
            println!("Export cancelled");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    export.save(&output)?;
    let report = ExportReport::new(&output, export.format, &export.files, export.duration);
    println!("\n{}", report.render());
    Ok(())
}

fn quick(args: QuickArgs) -> Result<()> {
    let range = args.lines.as_deref().map(LineRange::parse).transpose()?;
    let source = QuickSource::load(&args.file, range)?;

    if args.print {
        println!("{}", source.render(args.format));
        return Ok(());
    }

    let clipboard = SystemClipboard::detect()?;
    source.copy_to(args.format, &clipboard)?;
    println!("Copied {} to clipboard", args.format);
    Ok(())
}

fn exclude(args: ExcludeArgs) -> Result<()> {
    let store = args.workspace.store();
    match store.add_exclusion(&args.pattern)? {
        AddOutcome::Added => println!(
            "Added exclusion pattern {} to {}",
            args.pattern,
            store.path().display()
        ),
        AddOutcome::AlreadyExists => println!("Pattern already exists."),
    }
    Ok(())
}

fn settings(args: WorkspaceArgs) -> Result<()> {
    let store = args.store();
    let settings = store.load()?;

    if store.path().exists() {
        println!("Settings file: {}", store.path().display());
    } else {
        println!("Settings file: {} (not created yet)", store.path().display());
    }
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
