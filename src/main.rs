//! Parcelstore CLI - register and track parcels in a SQLite database

use clap::{Parser, Subcommand};
use parcelstore::config::{self, ParcelConfig};
use parcelstore::output::{emit_success, is_quiet, OutputMode};
use parcelstore::ui::{self, theme, Icons};
use parcelstore::{ParcelService, ParcelStatus};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "parcelstore")]
#[command(version)]
#[command(about = "Register and track parcels in a SQLite database")]
#[command(long_about = r#"
Parcelstore keeps parcel records (client, status, address, creation time)
in a single SQLite table.

Example usage:
  parcelstore init
  parcelstore register --client 1000 --address "Main St 1"
  parcelstore list --client 1000
  parcelstore advance 1
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Print nothing on success (also PARCELSTORE_QUIET=1)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the config file (defaults to parcelstore.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and its parcel table; other commands need this first
    Init {
        /// Also write a config file pointing at this database
        #[arg(long)]
        write_config: bool,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Register a new parcel
    Register {
        /// Owning client id
        #[arg(long)]
        client: i64,

        /// Delivery address
        #[arg(short, long)]
        address: String,
    },

    /// Show a single parcel
    Show {
        number: i64,
    },

    /// List all parcels of a client
    List {
        /// Owning client id
        #[arg(long)]
        client: i64,
    },

    /// Change the address of a registered parcel
    Address {
        number: i64,
        address: String,
    },

    /// Move a parcel to its next status
    Advance {
        number: i64,
    },

    /// Overwrite a parcel's status without transition checks
    SetStatus {
        number: i64,
        /// registered, sent or delivered
        status: String,
    },

    /// Delete a registered parcel
    Delete {
        number: i64,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mode = OutputMode::from_flags(cli.json, cli.quiet || is_quiet());
    if let Err(e) = run(cli, mode) {
        match mode {
            OutputMode::Json => {
                let body = serde_json::json!({ "ok": false, "error": format!("{e:#}") });
                println!("{body}");
            }
            OutputMode::Human | OutputMode::Quiet => ui::error(&format!("{e:#}")),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, mode: OutputMode) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let loaded = config::load_config(Some(&config_path))?;
    let database = config::resolve_database_path(cli.database, loaded.as_ref());
    tracing::debug!(database = %database.display(), config = %config_path.display(), "resolved paths");

    let conn = match cli.command {
        Commands::Init { .. } => config::create_database(&database)?,
        _ => config::open_database(&database)?,
    };
    let service = ParcelService::new(&conn);

    match cli.command {
        Commands::Init { write_config, force } => {
            if write_config {
                let cfg = ParcelConfig {
                    database: Some(database.display().to_string()),
                };
                config::write_config(&config_path, &cfg, force)?;
            }

            if mode.is_human() {
                ui::success("Parcel table ready");
                ui::info("Database", &database.display().to_string());
                if write_config {
                    ui::info("Config", &config_path.display().to_string());
                }
            }
            emit_success(mode, "init", serde_json::json!({ "database": database }))?;
        }

        Commands::Register { client, address } => {
            let parcel = service.register(client, &address)?;
            if mode.is_human() {
                ui::success(&format!("Registered parcel {}", parcel.number));
                println!("{}", ui::parcel_table(std::slice::from_ref(&parcel)));
            }
            emit_success(mode, "register", &parcel)?;
        }

        Commands::Show { number } => {
            let parcel = service.get(number)?;
            if mode.is_human() {
                println!("{}", ui::parcel_table(std::slice::from_ref(&parcel)));
            }
            emit_success(mode, "show", &parcel)?;
        }

        Commands::List { client } => {
            let parcels = service.client_parcels(client)?;
            if mode.is_human() {
                ui::header(&format!("{} Parcels of client {}", Icons::PERSON, client));
                if parcels.is_empty() {
                    println!("{}", ui::dim("No parcels found."));
                } else {
                    println!("{}", ui::parcel_table(&parcels));
                    ui::summary_row("Total:", &parcels.len().to_string());
                }
            }
            emit_success(mode, "list", &parcels)?;
        }

        Commands::Address { number, address } => {
            service.change_address(number, &address)?;
            if mode.is_human() {
                ui::success(&format!("Parcel {} now goes to {}", number, address));
            }
            emit_success(mode, "address", serde_json::json!({ "number": number, "address": address }))?;
        }

        Commands::Advance { number } => {
            let status = service.next_status(number)?;
            if mode.is_human() {
                println!(
                    "{} Parcel {} is now {}",
                    Icons::RIGHT,
                    number,
                    status.style(theme().status(status))
                );
            }
            emit_success(mode, "advance", serde_json::json!({ "number": number, "status": status }))?;
        }

        Commands::SetStatus { number, status } => {
            let status: ParcelStatus = status.parse()?;
            service.store().set_status(number, status)?;
            if mode.is_human() {
                ui::warn(&format!("Status of parcel {} forced to {}", number, status));
            }
            emit_success(mode, "set-status", serde_json::json!({ "number": number, "status": status }))?;
        }

        Commands::Delete { number } => {
            service.remove(number)?;
            if mode.is_human() {
                println!("{} Deleted parcel {}", Icons::DEL, number);
            }
            emit_success(mode, "delete", serde_json::json!({ "number": number }))?;
        }
    }

    Ok(())
}
