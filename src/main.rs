//! Cartkit CLI
//!
//! Drives a file-backed cart from the terminal.

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use cartkit::{
    catalog::{Catalog, CatalogError, LineIdentity},
    config::{CartConfig, ConfigError},
    notifications::Notifier,
    observability::{self, LogFormat, ObservabilityError},
    pricing::format_amount,
    products::{LineId, ProductSnapshot},
    storage::FileStorage,
    store::{CartError, CartStore, ChangeKind},
    view::{CartView, ViewAction},
};
use clap::{Args, Parser, Subcommand};
use jiff::Timestamp;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "cartkit", about = "Shopping cart CLI", long_about = None)]
struct Cli {
    /// Cart configuration file (YAML)
    #[arg(long, env = "CARTKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory the cart is persisted in
    #[arg(long, env = "CARTKIT_STORAGE_DIR", default_value = ".cartkit")]
    storage_dir: PathBuf,

    /// Product catalog file (YAML)
    #[arg(long, env = "CARTKIT_CATALOG", default_value = "fixtures/catalog/demo.yml")]
    catalog: PathBuf,

    /// Override how card adds derive line ids
    #[arg(long, env = "CARTKIT_LINE_IDENTITY", value_enum)]
    line_identity: Option<LineIdentity>,

    #[command(flatten)]
    logging: LoggingArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct LoggingArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the cart
    Show,

    /// Add a catalog product by key
    Add {
        /// Catalog key
        key: String,
    },

    /// Add an arbitrary product
    AddLine(AddLineArgs),

    /// Add one unit to a line
    Increment {
        /// Line id
        id: u64,
    },

    /// Remove one unit from a line
    Decrement {
        /// Line id
        id: u64,
    },

    /// Remove a line
    Remove {
        /// Line id
        id: u64,
    },

    /// List catalog products
    Catalog,
}

#[derive(Debug, Args)]
struct AddLineArgs {
    /// Line id
    #[arg(long)]
    id: u64,

    /// Display name
    #[arg(long)]
    title: String,

    /// Unit price
    #[arg(long)]
    price: Decimal,

    /// Image URI
    #[arg(long, default_value = "")]
    image: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Observability(#[from] ObservabilityError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

type Store = CartStore<FileStorage, CartView>;

fn main() -> ExitCode {
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            _ = writeln!(io::stderr(), "error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    observability::init(&cli.logging.log_level, cli.logging.log_format)?;

    let mut config = match &cli.config {
        Some(path) => CartConfig::from_path(path)?,
        None => CartConfig::default(),
    };

    if let Some(identity) = cli.line_identity {
        config.line_identity = identity;
    }

    let currency = config.currency()?;

    let mut store = CartStore::with_observer(
        FileStorage::new(&cli.storage_dir),
        config.storage_key.as_str(),
        CartView::new(currency),
    );

    store.load();

    let mut notifier = Notifier::new(config.notification.timing());
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Show => store.observer().summary().write_table(&mut out)?,
        Commands::Add { key } => {
            let catalog = Catalog::from_path(&cli.catalog)?;
            let product = catalog.product(&key)?;
            let card_index = catalog.position(&key).unwrap_or_default();

            debug!(%key, card_index, identity = ?config.line_identity, "adding from catalog");

            let snapshot = product.snapshot(config.line_identity, card_index, Timestamp::now());
            let id = snapshot.id;
            let change = store.add_item(snapshot)?;

            report(&mut out, &mut notifier, &store, id, change)?;
        }
        Commands::AddLine(args) => {
            let snapshot = ProductSnapshot::new(args.id, args.title, args.price, args.image);
            let id = snapshot.id;
            let change = store.add_item(snapshot)?;

            report(&mut out, &mut notifier, &store, id, change)?;
        }
        Commands::Increment { id } => {
            let change = store.apply(ViewAction::Increment(LineId(id)))?;
            report(&mut out, &mut notifier, &store, LineId(id), change)?;
        }
        Commands::Decrement { id } => {
            let change = store.apply(ViewAction::Decrement(LineId(id)))?;
            report(&mut out, &mut notifier, &store, LineId(id), change)?;
        }
        Commands::Remove { id } => {
            let change = store.apply(ViewAction::Remove(LineId(id)))?;
            report(&mut out, &mut notifier, &store, LineId(id), change)?;
        }
        Commands::Catalog => {
            let catalog = Catalog::from_path(&cli.catalog)?;

            for product in catalog.iter() {
                writeln!(
                    out,
                    "{:<12} #{:<6} {:<24} {:>10}  ({} images)",
                    product.key,
                    product.id,
                    product.title,
                    format_amount(product.price, currency),
                    product.images.len()
                )?;
            }
        }
    }

    Ok(())
}

fn report(
    out: &mut impl Write,
    notifier: &mut Notifier,
    store: &Store,
    id: LineId,
    change: ChangeKind,
) -> Result<(), CliError> {
    match notifier.notify(change, Timestamp::now()) {
        Some(notification) => writeln!(out, "{}", notification.message)?,
        None => writeln!(out, "No line with id {id} in the cart.")?,
    }

    store.observer().summary().write_table(out)?;

    Ok(())
}
