//! # ekklesia CLI
//!
//! Command-line tools for ekklesia applications.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ekklesia")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to settings file (defaults to ekklesia.yml if present)
    #[arg(long, env = "EKKLESIA_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and inspect sortable identifiers
    Lid {
        #[command(subcommand)]
        command: LidCommands,
    },

    /// Show the effective settings
    Settings {
        /// Print a single value by dotted key (e.g. app.title)
        #[arg(long)]
        key: Option<String>,

        /// Emit JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum LidCommands {
    /// Generate new identifiers
    New {
        /// Number of identifiers
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Show the parts of an identifier
    Decode {
        /// Identifier in string form
        lid: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Convert an integer to the string form
    Encode {
        /// Identifier as unsigned 64-bit integer
        value: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Lid { command } => match command {
            LidCommands::New { count } => commands::new_lids(count),
            LidCommands::Decode { lid, json } => commands::decode_lid(&lid, json),
            LidCommands::Encode { value } => commands::encode_lid(value),
        },
        Commands::Settings { key, json } => {
            commands::show_settings(cli.config.as_deref(), key.as_deref(), json)
        }
    }
}
