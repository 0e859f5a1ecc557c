//! Kluster command line tool.
//!
//! Plans and runs record rechunking into Zarr stores, edits vessel
//! configuration files and exports georeferenced soundings.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use kluster::commands;
use kluster::KlusterConfig;
use record_chunking::RecordKind;
use sounding_export::ExportFormat;

#[derive(Parser, Debug)]
#[command(name = "kluster")]
#[command(about = "Multibeam record rechunking, vessel files and sounding export")]
struct Args {
    /// Configuration file path (YAML); environment variables otherwise
    #[arg(short, long, env = "KLUSTER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the chunk layout for a list of block lengths
    Plan {
        /// Records per source block, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        lengths: Vec<usize>,

        /// Records per output chunk
        #[arg(long)]
        chunk_size: usize,
    },

    /// Rechunk time blocks (JSON) into a Zarr store
    Rechunk {
        /// JSON file holding a list of time blocks
        input: PathBuf,

        /// Output Zarr store
        output: PathBuf,

        /// Record kind: ping, attitude or navigation
        #[arg(long, default_value = "ping")]
        kind: String,

        /// Override the configured chunk size for this kind
        #[arg(long)]
        chunk_size: Option<usize>,
    },

    /// Inspect or edit a vessel file
    Vessel {
        #[command(subcommand)]
        action: VesselCommand,
    },

    /// Export georeferenced pings (JSON) to point files or a sounding dataset
    Export {
        /// JSON file holding a list of ping datasets
        input: PathBuf,

        /// Directory to export into
        output_directory: PathBuf,

        /// Point file format
        #[arg(long, default_value = "csv")]
        format: String,

        /// Write soundings.zarr instead of point files
        #[arg(long)]
        dataset: bool,

        /// Check the written sounding count (dataset export only)
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Subcommand, Debug)]
enum VesselCommand {
    /// Print every system in the file
    Show { file: PathBuf },

    /// Print a system's entries in effect over a time range
    Query {
        file: PathBuf,
        system: String,
        /// Range start, UTC epoch seconds
        start: i64,
        /// Range end, UTC epoch seconds
        end: i64,
    },

    /// Merge a system record (JSON) into the file
    Update {
        file: PathBuf,
        system: String,
        /// JSON file holding the entries to merge
        data: PathBuf,

        /// Overwrite uncertainty values instead of carrying the latest over
        #[arg(long)]
        no_carry_over: bool,

        /// Create the vessel file if it does not exist
        #[arg(long)]
        create: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let config = KlusterConfig::load(args.config.as_deref())?;
    info!(
        ping_chunk_size = config.chunking.ping_chunk_size,
        compression = %config.chunking.zarr_compression,
        "Loaded configuration"
    );

    match args.command {
        Command::Plan { lengths, chunk_size } => print(&commands::plan(&lengths, chunk_size)?),
        Command::Rechunk {
            input,
            output,
            kind,
            chunk_size,
        } => {
            let kind = RecordKind::parse(&kind).with_context(|| format!("Unknown record kind: {}", kind))?;
            match commands::rechunk(&config, kind, &input, &output, chunk_size)? {
                Some(report) => print(&report),
                None => {
                    info!(input = %input.display(), "No records to rechunk");
                    Ok(())
                }
            }
        }
        Command::Vessel { action } => match action {
            VesselCommand::Show { file } => print(&commands::vessel_show(&file)?),
            VesselCommand::Query {
                file,
                system,
                start,
                end,
            } => print(&commands::vessel_query(&file, &system, start, end)?),
            VesselCommand::Update {
                file,
                system,
                data,
                no_carry_over,
                create,
            } => print(&commands::vessel_update(&file, &system, &data, !no_carry_over, create)?),
        },
        Command::Export {
            input,
            output_directory,
            format,
            dataset,
            validate,
        } => {
            let format: ExportFormat = format.parse()?;
            print(&commands::export(
                &config,
                &input,
                &output_directory,
                format,
                dataset,
                validate,
            )?)
        }
    }
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
