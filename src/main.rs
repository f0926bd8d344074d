//! idreg CLI - Command line interface for identity_registry
//!
//! Manages a registry file of identity records and computes / verifies its
//! Merkle root. Results go to stdout as JSON; logs go to stderr.

use clap::{Parser, Subcommand};
use identity_registry::{
    hash_record, FileStore, Record, RecordOrder, Registry, RegistryConfig, Verification,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "idreg")]
#[command(about = "An identity registry fingerprinted by a Merkle root")]
#[command(version)]
struct Cli {
    /// Path to the registry file [default: from config, else registry.idreg]
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Leaf order: insertion, passport_id or name [default: from config, else passport_id]
    #[arg(short, long, value_parser = parse_order)]
    order: Option<RecordOrder>,

    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new registry file
    Init {
        /// Overwrite an existing registry
        #[arg(long)]
        force: bool,
    },

    /// Add an identity record
    Add {
        /// Holder's name
        name: String,
        /// Date of birth
        dob: String,
        /// Passport id (must be unique)
        passport_id: String,
    },

    /// Get a record by passport id
    Get {
        /// The passport id
        passport_id: String,
    },

    /// List all records in leaf order
    List {
        /// Maximum number of records to return
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print the leaf digest of a record without touching the registry
    Hash {
        name: String,
        dob: String,
        passport_id: String,
    },

    /// Compute the Merkle root of the registry
    Root {
        /// Include every level of the tree
        #[arg(long)]
        levels: bool,
    },

    /// Verify a claimed identity against the Merkle root
    Verify {
        name: String,
        dob: String,
        passport_id: String,
    },

    /// Show registry status
    Status,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = RegistryConfig::load_or_default(cli.config.as_deref())?;
    let database = cli.database.clone().unwrap_or(config.database);
    let order = cli.order.unwrap_or(config.order);

    match cli.command {
        Commands::Init { force } => {
            if database.exists() && !force {
                anyhow::bail!(
                    "Registry already exists at {} (use --force to overwrite)",
                    database.display()
                );
            }
            let registry = Registry::create(&database)?;
            registry.sync()?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "message": format!("Created registry at {}", database.display())
                }),
            )?;
        }

        Commands::Add {
            name,
            dob,
            passport_id,
        } => {
            let registry = open_registry(&database, order)?;
            let record = registry.add_record(name, dob, passport_id)?;
            registry.sync()?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "passport_id": record.passport_id.to_string(),
                    "leaf": hash_record(&record).to_hex()
                }),
            )?;
        }

        Commands::Get { passport_id } => {
            let registry = open_registry(&database, order)?;
            let record = registry.get_record(passport_id)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "record": record,
                    "leaf": hash_record(&record).to_hex()
                }),
            )?;
        }

        Commands::List { limit } => {
            let registry = open_registry(&database, order)?;
            let mut records = registry.records()?;
            if let Some(limit) = limit {
                records.truncate(limit);
            }
            let items: Vec<_> = records
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "name": r.name,
                        "date_of_birth": r.date_of_birth,
                        "passport_id": r.passport_id.to_string(),
                        "leaf": hash_record(r).to_hex()
                    })
                })
                .collect();
            output(
                &cli.format,
                &serde_json::json!({
                    "order": order.as_str(),
                    "count": items.len(),
                    "records": items
                }),
            )?;
        }

        Commands::Hash {
            name,
            dob,
            passport_id,
        } => {
            let record = Record::new(name, dob, passport_id);
            output(
                &cli.format,
                &serde_json::json!({
                    "leaf": hash_record(&record).to_hex()
                }),
            )?;
        }

        Commands::Root { levels } => {
            let registry = open_registry(&database, order)?;
            let tree = registry.merkle_tree()?;
            let mut value = serde_json::json!({
                "order": order.as_str(),
                "count": tree.num_leaves(),
                "height": tree.height(),
                "root": tree.root().to_hex()
            });
            if levels {
                value["levels"] = serde_json::json!(tree
                    .levels()
                    .iter()
                    .map(|level| level.iter().map(|d| d.to_hex()).collect::<Vec<_>>())
                    .collect::<Vec<_>>());
            }
            output(&cli.format, &value)?;
        }

        Commands::Verify {
            name,
            dob,
            passport_id,
        } => {
            let registry = open_registry(&database, order)?;
            let report = registry.verify(name, dob, passport_id)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "outcome": report.outcome,
                    "candidate": report.candidate.to_hex(),
                    "root": report.root.to_hex(),
                    "count": report.record_count
                }),
            )?;
            if report.outcome == Verification::NotVerified {
                drop(registry);
                std::process::exit(1);
            }
        }

        Commands::Status => {
            let registry = open_registry(&database, order)?;
            let root = if registry.is_empty() {
                None
            } else {
                Some(registry.merkle_root()?.to_hex())
            };
            output(
                &cli.format,
                &serde_json::json!({
                    "database": database.display().to_string(),
                    "order": order.as_str(),
                    "count": registry.len(),
                    "root": root
                }),
            )?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_order(s: &str) -> Result<RecordOrder, String> {
    s.parse().map_err(|e: identity_registry::Error| e.to_string())
}

fn open_registry(path: &Path, order: RecordOrder) -> anyhow::Result<Registry<FileStore>> {
    if !path.exists() {
        anyhow::bail!(
            "No registry at {} (run `idreg init` first)",
            path.display()
        );
    }
    Ok(Registry::open(path)?.with_order(order))
}

fn output(format: &OutputFormat, value: &serde_json::Value) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(value)?);
        }
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }
    Ok(())
}
