//! CLI command structure using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "httpino")]
#[command(version, about = "Lock-safe JSON document store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store settings (TOML)
    #[arg(short, long, global = true, env = "HTTPINO_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a stored document
    Read {
        path: PathBuf,

        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },

    /// Atomically replace a document
    Write {
        path: PathBuf,

        /// Document as JSON text, or "-" to read it from stdin
        json: String,
    },

    /// Run concurrent writers and readers against one document
    Hammer {
        path: PathBuf,

        #[arg(long, default_value_t = 8)]
        writers: usize,

        #[arg(long, default_value_t = 8)]
        readers: usize,

        /// Operations per writer and per reader
        #[arg(long, default_value_t = 50)]
        rounds: usize,
    },
}
