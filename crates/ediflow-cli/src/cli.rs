//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Ediflow CLI - EDI payload validation and document linking
///
/// Validates advance-ship-notice pallet payloads against the required-field
/// rules and links inbound documents to the records they reference.
#[derive(Parser, Debug)]
#[command(
    name = "ediflow",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "EDIFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate pallet payloads and print the status/success/errorMessage result
    Validate(ValidateArgs),

    /// Link an inbound document to the first candidate record sharing its reference
    Link(LinkArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Payload files to validate ("-" reads stdin)
    #[arg(value_name = "PAYLOAD", conflicts_with = "from_env")]
    pub inputs: Vec<PathBuf>,

    /// Read the payload from this environment variable instead of a file
    #[arg(long, value_name = "VAR")]
    pub from_env: Option<String>,

    /// Exit successfully even when a payload is not VALID
    #[arg(long)]
    pub allow_invalid: bool,

    /// Show the JSON path of every violation
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for the link command
#[derive(Parser, Debug)]
pub struct LinkArgs {
    /// Inbound document JSON ({"id", "targetKey", "ownerId"})
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Candidate records JSON array ({"ownerId", "id", "primaryKey", "secondaryKey"})
    #[arg(long, value_name = "FILE")]
    pub candidates: PathBuf,

    /// Field on the document that receives the matched id
    #[arg(long)]
    pub field: Option<String>,

    /// Maximum number of candidates fetched per document
    #[arg(long)]
    pub page_limit: Option<usize>,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
