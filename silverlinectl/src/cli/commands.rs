//! CLI command and subcommand definitions

use clap::{Parser, Subcommand};
use silverline_core::types::ListType;
use std::path::PathBuf;

/// F5 Silverline IP-list CLI
#[derive(Parser, Debug)]
#[command(name = "silverlinectl")]
#[command(version, about = "Manage F5 Silverline IP allow/deny lists", long_about = None)]
pub struct Cli {
    /// Portal URL (overrides config file)
    #[arg(short, long)]
    pub server: Option<String>,

    /// API key (overrides config file and SILVERLINE_TOKEN)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Output format (overrides config file)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging (overrides config file)
    #[arg(short, long)]
    pub verbose: Option<bool>,

    /// Skip TLS certificate validation
    #[arg(long)]
    pub insecure: bool,

    /// Config file to load instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Don't load config file
    #[arg(long)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty table output
    Table,
    /// JSON output
    Json,
}

/// Which IP-list collection a command operates on
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ListTypeArg {
    Denylist,
    Allowlist,
}

impl From<ListTypeArg> for ListType {
    fn from(arg: ListTypeArg) -> Self {
        match arg {
            ListTypeArg::Denylist => ListType::Denylist,
            ListTypeArg::Allowlist => ListType::Allowlist,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check API connectivity and authentication
    Test,

    /// List IP objects in a list
    List {
        /// List to read
        #[arg(value_enum)]
        list_type: ListTypeArg,

        /// Fetch only these object ids (repeatable, comma-separated values
        /// accepted). One request is issued per id.
        #[arg(short = 'i', long = "id")]
        object_ids: Vec<String>,

        /// Page number; paging only takes effect together with --page-size
        #[arg(long)]
        page_number: Option<String>,

        /// Page size; paging only takes effect together with --page-number
        #[arg(long)]
        page_size: Option<String>,
    },

    /// Add an IP object to a list
    Add {
        /// List to modify
        #[arg(value_enum)]
        list_type: ListTypeArg,

        /// IP address to add
        ip: String,

        /// Routing target for the entry
        #[arg(long, default_value = "proxy-routed")]
        list_target: String,

        /// Subnet mask bits
        #[arg(long, default_value = "32")]
        mask: String,

        /// Entry lifetime in seconds (0 = never expires)
        #[arg(long, default_value_t = 0)]
        duration: i64,

        /// Free-text note attached to the entry
        #[arg(long, default_value = "")]
        note: String,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// Delete an IP object from a list
    Delete {
        /// List to modify
        #[arg(value_enum)]
        list_type: ListTypeArg,

        /// Id of the object to delete
        object_id: String,
    },

    /// Show or manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Reset configuration to defaults
    Reset,
}
