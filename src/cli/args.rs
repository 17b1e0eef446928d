//! Command line argument parsing for the minidic CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::dictionary::LoadPolicy;
use crate::dictionary::cursor::DEFAULT_PAGE_SIZE;

/// minidic - browse and serve pre-sorted dictionary files
#[derive(Parser, Debug, Clone)]
#[command(name = "minidic")]
#[command(about = "Browse and serve pre-sorted, tab-delimited dictionary files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct MinidicArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Directory holding the dictionary files
    #[arg(
        short = 'd',
        long = "dir",
        env = "MINIDIC_DIR",
        default_value = "recursos",
        global = true
    )]
    pub dictionary_dir: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl MinidicArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve dictionary queries over HTTP
    Serve(ServeArgs),

    /// List the dictionaries in the dictionary directory
    List(ListArgs),

    /// Load a dictionary and print its entry count
    Open(OpenArgs),

    /// Print a range of entries
    Entries(EntriesArgs),

    /// Print the position of the entry nearest to a word
    Nearest(NearestArgs),

    /// Page through a dictionary the way the browser client does
    Browse(BrowseArgs),
}

/// Arguments for the HTTP server
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "MINIDIC_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "MINIDIC_PORT", default_value = "8080")]
    pub port: u16,

    /// Policy for queries on dictionaries that were never opened
    #[arg(long, default_value = "explicit")]
    pub load_policy: LoadPolicyArg,

    /// Allow clients to stop the server with /terminar
    #[arg(long)]
    pub allow_shutdown: bool,
}

/// Load policies selectable from the command line
#[derive(ValueEnum, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadPolicyArg {
    /// Only /carregar loads a dictionary
    Explicit,
    /// Range and nearest queries load dictionaries on first use
    OnDemand,
}

impl From<LoadPolicyArg> for LoadPolicy {
    fn from(arg: LoadPolicyArg) -> Self {
        match arg {
            LoadPolicyArg::Explicit => LoadPolicy::Explicit,
            LoadPolicyArg::OnDemand => LoadPolicy::OnDemand,
        }
    }
}

/// Arguments for listing dictionaries
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Show file sizes
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for opening a dictionary
#[derive(Parser, Debug, Clone)]
pub struct OpenArgs {
    /// Dictionary file name
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// Arguments for printing a range of entries
#[derive(Parser, Debug, Clone)]
pub struct EntriesArgs {
    /// Dictionary file name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// First position (inclusive)
    #[arg(value_name = "START", allow_hyphen_values = true)]
    pub start: i64,

    /// Last position (exclusive)
    #[arg(value_name = "END", allow_hyphen_values = true)]
    pub end: i64,
}

/// Arguments for the nearest-entry lookup
#[derive(Parser, Debug, Clone)]
pub struct NearestArgs {
    /// Dictionary file name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Word to look up
    #[arg(value_name = "TERM")]
    pub term: String,
}

/// Arguments for paging through a dictionary
#[derive(Parser, Debug, Clone)]
pub struct BrowseArgs {
    /// Dictionary file name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Start at the entry nearest to this word
    #[arg(long, conflicts_with = "last")]
    pub at: Option<String>,

    /// Start at the last page
    #[arg(long)]
    pub last: bool,

    /// Move this many pages back from the starting page
    #[arg(long, default_value = "0")]
    pub back: usize,

    /// Number of consecutive pages to print
    #[arg(long, default_value = "1")]
    pub pages: usize,

    /// Entries per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    Human,
    /// JSON
    Json,
}
