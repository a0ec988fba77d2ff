//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Deep Intelligence command-line client
#[derive(Parser, Debug)]
#[command(name = "deepint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API token (overrides DEEPINT_TOKEN and the config file)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Organization id (overrides DEEPINT_ORGANIZATION and the config file)
    #[arg(short, long, global = true)]
    pub organization: Option<String>,

    /// Instance host (overrides DEEPINT_INSTANCE and the config file)
    #[arg(long, global = true)]
    pub instance: Option<String>,

    /// Config file to read instead of ~/.deepint.ini
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show resolved credentials (token redacted)
    Credentials,

    /// List workspaces of the organization
    Workspaces,

    /// Show one workspace
    Workspace {
        /// Workspace id
        id: String,
    },

    /// List sources of a workspace
    Sources {
        /// Workspace id
        #[arg(short, long)]
        workspace: String,
    },

    /// Show one source with its features
    Source {
        /// Workspace id
        #[arg(short, long)]
        workspace: String,

        /// Source id
        id: String,
    },

    /// Fetch rows of a source
    Instances {
        /// Workspace id
        #[arg(short, long)]
        workspace: String,

        /// Source id
        source: String,

        /// Filter expression
        #[arg(long = "where")]
        where_clause: Option<String>,

        /// Maximum rows
        #[arg(long)]
        limit: Option<u64>,

        /// Print rows as CSV instead of JSON
        #[arg(long)]
        csv: bool,
    },

    /// List tasks of a workspace
    Tasks {
        /// Workspace id
        #[arg(short, long)]
        workspace: String,

        /// Only tasks in this state (pending, running, success, failed)
        #[arg(long)]
        status: Option<String>,
    },

    /// Call an endpoint the CLI does not wrap
    Call {
        /// HTTP method (GET, POST, PUT, DELETE)
        method: String,

        /// Path relative to the API root, e.g. workspace/<id>/sources
        path: String,

        /// Parameter as key=value; values that parse as JSON are sent as JSON
        #[arg(short, long = "param")]
        params: Vec<String>,

        /// Header as key=value
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Follow pagination and print every item
        #[arg(long)]
        paginated: bool,
    },

    /// Parse a web or API URL into its identifiers
    Locate {
        /// URL to parse
        url: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON, one document per line
    Json,
    /// Indented JSON
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "deepint",
            "sources",
            "-w",
            "ws-1",
            "--token",
            "abc",
            "--format",
            "pretty",
        ]);
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(matches!(cli.command, Commands::Sources { ref workspace } if workspace == "ws-1"));
    }

    #[test]
    fn test_call_collects_params() {
        let cli = Cli::parse_from([
            "deepint", "call", "get", "workspaces", "-p", "page=1", "-p", "name=x", "--paginated",
        ]);
        match cli.command {
            Commands::Call {
                method,
                params,
                paginated,
                ..
            } => {
                assert_eq!(method, "get");
                assert_eq!(params, vec!["page=1", "name=x"]);
                assert!(paginated);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
