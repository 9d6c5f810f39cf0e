//! easy-defaults - inspect and populate namespaced defaults stores.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use easy_defaults::commands::{manage, read, seed, write};
use easy_defaults::commands::write::ValueType;
use easy_defaults::config::{BackendKind, Config};
use easy_defaults::store::DefaultsStore;

#[derive(Parser)]
#[command(name = "easy-defaults")]
#[command(version, about = "Inspect and populate namespaced defaults stores", long_about = None)]
struct Cli {
    /// Config file (default: ~/.easy-defaults/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Domain to operate on (overrides store.namespace)
    #[arg(short, long, global = true)]
    domain: Option<String>,

    /// Persistence backend (overrides store.backend)
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendKind>,

    /// Database file or domains directory (overrides store.path)
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one value, or every entry of the domain
    Read {
        /// Key to read (omit to print the whole domain)
        key: Option<String>,
    },
    /// Store a typed value
    Write {
        key: String,
        value: String,
        /// How to parse VALUE
        #[arg(short = 't', long = "type", value_enum, default_value_t = ValueType::String)]
        value_type: ValueType,
    },
    /// Remove a key
    Delete { key: String },
    /// List keys in the domain
    Keys,
    /// Erase every entry of the domain
    Clear,
    /// Write sample values of every type
    Seed {
        /// Number of rounds (each writes five values)
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(domain) = cli.domain {
        config.store.namespace = domain;
    }
    if let Some(backend) = cli.backend {
        config.store.backend = backend;
    }
    if let Some(path) = cli.path {
        config.store.path = Some(path);
    }

    init_logging(&config.log.level);

    let validation = config.validate()?;
    for warning in &validation.warnings {
        tracing::warn!("{warning}");
    }

    let store = DefaultsStore::from_config(&config).context("Failed to open defaults store")?;
    tracing::debug!(
        namespace = %store.namespace(),
        backend = %config.store.backend,
        "Store ready"
    );

    match cli.command {
        Commands::Read { key } => read::execute(&store, key.as_deref()),
        Commands::Write {
            key,
            value,
            value_type,
        } => write::execute(&store, &key, &value, value_type),
        Commands::Delete { key } => manage::delete(&store, &key),
        Commands::Keys => manage::keys(&store),
        Commands::Clear => manage::clear(&store),
        Commands::Seed { count } => seed::execute(&store, count),
    }
}

/// Initialize stderr logging. `RUST_LOG` takes precedence over the config.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
