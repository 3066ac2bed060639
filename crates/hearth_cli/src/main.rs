//! Hearth CLI
//!
//! Command-line access to a Hearth store.
//!
//! # Commands
//!
//! - `put` - Write a record
//! - `get` - Print a record
//! - `has` - Check whether a record exists
//! - `delete` - Remove a record
//! - `rename` - Move a record to a new name
//! - `keys` - List storage keys
//! - `du` - Report disk usage
//! - `digest` - Print the storage key of a name
//! - `id` - Print a new time-ordered identifier
//! - `version` - Print build information

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use hearth_fs::Filesystem;
use hearth_log::{Level, LogConfig};
use hearth_store::{default_store_dir, Store, StoreOptions};
use std::path::PathBuf;

/// Hearth store command-line tools.
#[derive(Parser)]
#[command(name = "hearth")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output (same as --log-level debug)
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Minimum log level (error, warn, info, debug, trace)
    #[arg(global = true, long)]
    log_level: Option<Level>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One item per line
    Text,
    /// A JSON document
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a record (from --value, --file or standard input)
    Put {
        /// Record name
        name: String,

        /// Record content
        #[arg(long, conflicts_with = "file")]
        value: Option<String>,

        /// Read the record content from this file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Print a record to standard output
    Get {
        /// Record name, or storage key with --key
        name: String,

        /// Treat NAME as a storage key
        #[arg(short, long)]
        key: bool,
    },

    /// Check whether a record exists
    Has {
        /// Record name
        name: String,
    },

    /// Remove a record
    Delete {
        /// Record name
        name: String,
    },

    /// Move a record to a new name
    Rename {
        /// Current name
        old: String,

        /// New name
        new: String,
    },

    /// List storage keys
    Keys {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Report the disk usage of the store
    Du {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the storage key of a name
    Digest {
        /// Record name
        name: String,
    },

    /// Print a new time-ordered identifier (UUID v7)
    Id,

    /// Show build information
    Version {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Fail unless the version satisfies this constraint (e.g. ">=0.3, <1")
        #[arg(long)]
        check: Option<String>,
    },
}

fn main() {
    // Captured before anything creates files.
    let fs = Filesystem::init();
    let cli = Cli::parse();

    let level = match (cli.log_level, cli.verbose) {
        (Some(level), _) => level,
        (None, true) => Level::Debug,
        (None, false) => Level::Warn,
    };
    if let Err(e) = hearth_log::init(&LogConfig::new().level(level)) {
        eprintln!("hearth: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli, fs) {
        hearth_log::fatal(e);
    }
}

fn run(cli: Cli, fs: Filesystem) -> Result<(), Box<dyn std::error::Error>> {
    let path = cli.path.unwrap_or_else(default_store_dir);
    let open = || Store::new(StoreOptions::new().path(&path).cache_size(0), fs);

    match cli.command {
        Commands::Put { name, value, file } => {
            commands::record::put(&mut open(), &name, value, file.as_deref())?;
        }
        Commands::Get { name, key } => {
            commands::record::get(&mut open(), &name, key)?;
        }
        Commands::Has { name } => {
            commands::record::has(&mut open(), &name)?;
        }
        Commands::Delete { name } => {
            commands::record::delete(&mut open(), &name)?;
        }
        Commands::Rename { old, new } => {
            commands::record::rename(&mut open(), &old, &new)?;
        }
        Commands::Keys { format } => {
            commands::keys::run(&mut open(), format)?;
        }
        Commands::Du { format } => {
            commands::du::run(&mut open(), format)?;
        }
        Commands::Digest { name } => {
            println!("{}", Store::digest(&name));
        }
        Commands::Id => {
            println!("{}", hearth_version::new_id());
        }
        Commands::Version { format, check } => {
            commands::version::run(format, check.as_deref())?;
        }
    }

    Ok(())
}
