//! RecordKV CLI
//!
//! Uploads record files into the store and queries it. The store is
//! restored from the data directory on start and saved back on exit.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use recordkv::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// RecordKV CLI
#[derive(Parser, Debug)]
#[command(name = "recordkv")]
#[command(about = "Validate record uploads and keep them in a snapshot-backed store")]
#[command(version)]
struct Args {
    /// Data directory holding the snapshot
    #[arg(short, long, default_value = "./recordkv_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a file and save its records
    Upload {
        /// File to upload
        file: PathBuf,
    },

    /// Parse a file without saving anything
    Check {
        /// File to validate
        file: PathBuf,
    },

    /// Get a record by primary key
    Get {
        /// The key to get
        key: String,
    },

    /// Delete a record by primary key
    Delete {
        /// The key to delete
        key: String,
    },

    /// Print every record
    List,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,recordkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("RecordKV v{}", recordkv::VERSION);
    tracing::debug!("Data directory: {}", args.data_dir.display());

    // Validation needs no store
    if let Commands::Check { file } = &args.command {
        return check(file);
    }

    let config = Config::builder().data_dir(&args.data_dir).build();
    let engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let status = run(&engine, args.command);

    if let Err(e) = engine.close() {
        tracing::error!("Failed to save snapshot: {}", e);
        return ExitCode::FAILURE;
    }

    status
}

fn run(engine: &Engine, command: Commands) -> ExitCode {
    match command {
        Commands::Upload { file } => {
            let reader = match File::open(&file) {
                Ok(f) => f,
                Err(e) => {
                    tracing::error!("Cannot open {}: {}", file.display(), e);
                    return ExitCode::FAILURE;
                }
            };

            match engine.upload(reader) {
                Ok(report) => {
                    println!("{}", report);
                    for key in &report.duplicates {
                        println!("duplicate: {}", key);
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Get { key } => match engine.find(&key) {
            Ok(record) => {
                println!("{}", record);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Delete { key } => match engine.delete(&key) {
            Ok(_) => {
                println!("record deleted for PRIMARY_KEY={}", key);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
        Commands::List => {
            for record in engine.store().snapshot() {
                println!("{}", record);
            }
            ExitCode::SUCCESS
        }
        Commands::Check { file } => check(&file),
    }
}

fn check(file: &Path) -> ExitCode {
    let reader = match File::open(file) {
        Ok(f) => BufReader::new(f),
        Err(e) => {
            tracing::error!("Cannot open {}: {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match recordkv::parse_reader(reader) {
        Ok(records) => {
            println!("{} records, file is valid", records.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
