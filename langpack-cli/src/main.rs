//! Langpack - language package lifecycle for modular host applications
//!
//! Main entry point: argument parsing, tracing setup and dispatch

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use langpack_core::catalog::{CatalogProvider, HttpCatalog, HttpInstaller};
use langpack_core::config::LangpackConfig;
use langpack_core::lifecycle::{Collaborators, RunStatus};
use langpack_core::store::{Category, FsStore, SettingsFile};

mod language_cli;
mod output;

use language_cli::{CoreCommand, ExtensionCommand};

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "langpack",
    about = "Install, update, activate and remove language packs",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Configuration file (defaults to the platform config directory)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Host application content root
    #[clap(long, global = true)]
    content_dir: Option<PathBuf>,

    /// Catalog API base URL
    #[clap(long, global = true)]
    api_url: Option<String>,

    /// Core product version sent to the catalog
    #[clap(long, global = true)]
    product_version: Option<String>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Emit logs as JSON
    #[clap(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage core languages
    Core {
        #[clap(subcommand)]
        command: CoreCommand,
    },

    /// Manage plugin languages
    Plugin {
        #[clap(subcommand)]
        command: ExtensionCommand,
    },

    /// Manage theme languages
    Theme {
        #[clap(subcommand)]
        command: ExtensionCommand,
    },

    /// Activate an installed core language
    SwitchLanguage { locale: String },
}

fn initialize_tracing(log_level: &LogLevel, json: bool) {
    let filter = EnvFilter::new(log_level.to_filter_directive());

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

impl Cli {
    /// Configuration file values with command-line overrides applied
    fn resolve_config(&self) -> Result<LangpackConfig> {
        let mut config = match &self.config {
            Some(path) => LangpackConfig::load_from_path(path)?,
            None => LangpackConfig::load()?,
        };

        if let Some(content_dir) = &self.content_dir {
            config.content_dir = content_dir.clone();
        }
        if let Some(api_url) = &self.api_url {
            config.api_url = api_url.clone();
        }
        if let Some(product_version) = &self.product_version {
            config.product_version = product_version.clone();
        }

        Ok(config)
    }
}

fn build_collaborators(config: &LangpackConfig) -> Result<Collaborators> {
    let layout = config.layout();
    let store = Arc::new(FsStore::new(layout.clone(), &config.product_version));
    let catalog: Arc<dyn CatalogProvider> = Arc::new(HttpCatalog::new(
        &config.api_url,
        &config.product_version,
        config.timeout(),
    )?);
    let installer = Arc::new(HttpInstaller::new(
        catalog.clone(),
        layout.clone(),
        config.timeout(),
    )?);
    let settings = Arc::new(SettingsFile::in_languages_root(&layout.languages_root()));

    Ok(Collaborators {
        catalog,
        installer,
        state: store.clone(),
        files: store,
        activation: settings,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, cli.log_json);

    let config = cli.resolve_config()?;
    debug!("Using content directory: {}", config.content_dir.display());
    let collaborators = build_collaborators(&config)?;

    let status = match cli.command {
        Command::Core { command } => language_cli::execute_core(command, collaborators).await?,
        Command::Plugin { command } => {
            language_cli::execute_extension(Category::Plugin, command, collaborators).await?
        }
        Command::Theme { command } => {
            language_cli::execute_extension(Category::Theme, command, collaborators).await?
        }
        Command::SwitchLanguage { locale } => {
            language_cli::execute_switch_language(&locale, collaborators)?
        }
    };

    if status == RunStatus::Error {
        std::process::exit(1);
    }
    Ok(())
}
