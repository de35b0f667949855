//! CLI module for Sitat.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Sitat - Interview Quote Extraction
///
/// A CLI tool for turning customer interview transcripts into structured,
/// attributable quotes. The name "Sitat" is the Norwegian word for "quote."
#[derive(Parser, Debug)]
#[command(name = "sitat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Sitat and verify configuration
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Parse a transcript and show its segments without extracting
    Parse {
        /// Path to the transcript text file
        input: String,

        /// Print segments as JSON instead of the readable listing
        #[arg(long)]
        json: bool,

        /// Skip detection and force a transcript format
        /// (ranged, numbered-full, numbered-short, named, inline)
        #[arg(long)]
        format: Option<String>,

        /// List detected question/answer pairs instead of segments
        #[arg(long)]
        pairs: bool,
    },

    /// Extract quotes from a transcript
    Extract {
        /// Path to the transcript text file
        input: String,

        /// Client identifier (defaults to the company name)
        #[arg(long)]
        client_id: Option<String>,

        /// Company the interviewee works for
        #[arg(long)]
        company: String,

        /// Interviewee name
        #[arg(long)]
        interviewee: String,

        /// Deal status (closed won, closed lost, no decision)
        #[arg(long, default_value = "no decision")]
        deal_status: String,

        /// Interview date (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,

        /// Output format (csv, json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Skip recording the run in the response store
        #[arg(long)]
        no_store: bool,
    },

    /// Export stored responses
    Export {
        /// Run id, or a company name with --company
        id: String,

        /// Treat the id as a company name
        #[arg(long)]
        company: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,

        /// Output format (csv, json)
        #[arg(long, default_value = "csv")]
        format: String,
    },

    /// List recorded extraction runs
    List,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value (e.g. `set extraction.model gpt-4o`)
    Set {
        /// Dotted key, like `chunking.target_tokens`
        key: String,

        /// New value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
