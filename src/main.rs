//! Command-line access to an integration's translation strings.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{
    Parser,
    Subcommand,
};
use thiserror::Error;
use tokio::sync::watch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vicare_i18n::catalog::{
    CatalogSources,
    SOURCE_LANGUAGE,
    Severity,
};
use vicare_i18n::config::{
    ConfigError,
    ConfigManager,
};
use vicare_i18n::indexer::{
    CatalogLoader,
    IndexerError,
};
use vicare_i18n::reload::{
    DEFAULT_RELOAD_INTERVAL,
    ReloadWatcher,
};
use vicare_i18n::store::{
    self,
    TranslationStore,
};
use vicare_i18n::{
    ParseError,
    TranslationError,
    bundled,
};

/// Look up, format and check the ViCare integration's translation strings
#[derive(Parser, Debug)]
#[command(name = "vicare-i18n", version)]
struct Cli {
    /// What to do.
    #[command(subcommand)]
    command: Command,

    /// Integration directory with strings.json; the bundled strings are used if omitted
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved string of a key
    Get {
        /// Key path, e.g. entity.sensor.outside_temperature.name
        key: String,
        /// Language tag, falling back to its base language and the source
        #[arg(long, default_value = SOURCE_LANGUAGE)]
        lang: String,
    },
    /// Print a key with its placeholders substituted
    Format {
        /// Key path of a message template
        key: String,
        /// Placeholder values as NAME=VALUE
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
        /// Language tag
        #[arg(long, default_value = SOURCE_LANGUAGE)]
        lang: String,
    },
    /// List source keys, optionally below a prefix
    Keys {
        /// Only keys equal to or below this path
        prefix: Option<String>,
    },
    /// Report problems in the source strings and translations
    Check,
    /// Print all strings of a language as host keys, in JSON
    Dump {
        /// Language tag
        #[arg(long, default_value = SOURCE_LANGUAGE)]
        lang: String,
    },
    /// Reload the strings whenever the files change
    Watch,
}

/// Everything that makes the binary exit with a failure.
#[derive(Error, Debug)]
enum CliError {
    /// The settings file is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The integration files could not be loaded.
    #[error(transparent)]
    Indexer(#[from] IndexerError),

    /// Lookup, resolution or formatting failed.
    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// Strings compiled into the binary failed to parse.
    #[error("Bundled strings are invalid: {0}")]
    Bundled(#[from] ParseError),

    /// `dump` output could not be serialized.
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// `--log-file` has no file name.
    #[error("Invalid log file path '{}'", .0.display())]
    LogFile(PathBuf),

    /// Ctrl-C handler could not be installed.
    #[error("Failed to wait for Ctrl-C: {0}")]
    Signal(#[source] std::io::Error),

    /// The bundled strings never change.
    #[error("'watch' needs --root")]
    WatchNeedsRoot,

    /// `check` found this many errors.
    #[error("{0} error(s) found")]
    CheckFailed(usize),
}

/// Parses `NAME=VALUE`.
fn parse_param(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{arg}'"))
}

/// Logs to stderr, or to `log_file` through a background writer kept alive by the guard.
fn init_tracing(verbose: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>, CliError> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let registry = tracing_subscriber::registry().with(filter);

    let Some(path) = log_file else {
        registry.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)).init();
        return Ok(None);
    };

    let file_name = path.file_name().ok_or_else(|| CliError::LogFile(path.to_path_buf()))?;
    let directory = path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    registry.with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false)).init();

    Ok(Some(guard))
}

/// Loads the settings under `root` and a loader for its files.
fn loader_for(root: &Path) -> Result<(CatalogLoader, ConfigManager), CliError> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(root))?;
    let loader = CatalogLoader::from_config(root, &config_manager)?;
    Ok((loader, config_manager))
}

/// Sources under `root`, or the bundled ones.
async fn load_sources(root: Option<&Path>) -> Result<CatalogSources, CliError> {
    match root {
        Some(root) => {
            let (loader, _) = loader_for(root)?;
            Ok(loader.load_sources().await?)
        }
        None => Ok(bundled::sources()?),
    }
}

/// Reloads `root` until Ctrl-C, printing each new generation.
async fn watch_root(root: &Path) -> Result<(), CliError> {
    let (loader, config_manager) = loader_for(root)?;
    let interval =
        config_manager.get_settings().reload.interval().unwrap_or(DEFAULT_RELOAD_INTERVAL);

    let inputs = loader.read_inputs().await?;
    let catalog = loader.parse_inputs(&inputs)?.build()?;
    let store = store::install(TranslationStore::new(catalog))?;

    let watcher = ReloadWatcher::new(loader, Arc::clone(&store), interval).with_baseline(inputs);
    let mut updates = watcher.subscribe();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(watcher.run(shutdown_rx));

    println!("Watching {} (Ctrl-C to stop)", root.display());
    let result = loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => break signal.map_err(CliError::Signal),
            changed = updates.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let (catalog, generation) = store.snapshot_with_generation();
                println!("generation {generation}: {} keys", catalog.source().len());
            }
        }
    };

    shutdown_tx.send_replace(true);
    if let Err(e) = task.await {
        tracing::warn!("Reload task ended abnormally: {e}");
    }
    result
}

/// Runs the subcommand.
async fn run(cli: Cli) -> Result<(), CliError> {
    let root = cli.root.as_deref();

    match cli.command {
        Command::Get { key, lang } => {
            let catalog = load_sources(root).await?.build()?;
            println!("{}", catalog.resolve_in(&lang, &key)?);
        }
        Command::Format { key, params, lang } => {
            let catalog = load_sources(root).await?.build()?;
            let params: HashMap<String, String> = params.into_iter().collect();
            println!("{}", catalog.format(&lang, &key, &params)?);
        }
        Command::Keys { prefix } => {
            let catalog = load_sources(root).await?.build()?;
            for key in catalog.keys(prefix.as_deref().unwrap_or_default()) {
                println!("{key}");
            }
        }
        Command::Check => {
            let diagnostics = load_sources(root).await?.diagnose();
            for diagnostic in &diagnostics {
                println!("{diagnostic}");
            }
            let errors = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
            if errors > 0 {
                return Err(CliError::CheckFailed(errors));
            }
        }
        Command::Dump { lang } => {
            let catalog = load_sources(root).await?.build()?;
            println!("{}", serde_json::to_string_pretty(&catalog.host_strings(&lang)?)?);
        }
        Command::Watch => {
            watch_root(root.ok_or(CliError::WatchNeedsRoot)?).await?;
        }
    }

    Ok(())
}

/// Sets up logging and reports the error of `run`.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match init_tracing(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
