use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "macroz", version)]
#[command(about = "Binary-safe store for named keystroke macros", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this store file instead of the default one
    #[arg(short, long, global = true, env = "MACROZ_FILE")]
    pub file: Option<PathBuf>,

    /// Override the configured formatter (none, jq, json-tool)
    #[arg(long, global = true)]
    pub formatter: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a macro. The raw capture is read from stdin unless given otherwise
    #[command(alias = "a")]
    Add {
        /// Name of the macro
        name: String,

        /// Human-readable content (defaults to the key notation of the capture)
        #[arg(short, long)]
        content: Option<String>,

        /// Read the raw capture from this file
        #[arg(short, long, conflicts_with = "encoded")]
        input: Option<PathBuf>,

        /// Raw capture, already base64 encoded
        #[arg(long)]
        encoded: Option<String>,
    },

    /// List macros
    #[command(alias = "ls")]
    List,

    /// Remove one or more macros
    #[command(alias = "rm")]
    Remove {
        /// Indexes or names of the macros (e.g. 1 3 greet, or name:42 for a numeric name)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Show a macro
    #[command(alias = "v")]
    Show {
        /// Index or name of the macro (name:42 for a numeric name)
        selector: String,

        /// Write only the decoded capture bytes to stdout
        #[arg(long)]
        raw: bool,
    },

    /// Find macros by content prefix
    Find {
        /// Prefix of the content (or the exact name with --name)
        term: String,

        /// Match the name exactly instead of the content prefix
        #[arg(long)]
        name: bool,
    },

    /// Check every macro's payload
    Doctor,

    /// Get or set configuration
    Config {
        /// Configuration key (formatter, formatter-timeout-ms, fallback-on-write-failure)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print the path of the store file
    Path,
}
