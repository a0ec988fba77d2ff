//! CLI module
//!
//! Command-line interface over the SDK.
//!
//! # Commands
//!
//! - `credentials` - Show the resolved credentials and where each came from
//! - `workspaces` / `workspace` - List or show workspaces
//! - `sources` / `source` / `instances` - Inspect sources and their rows
//! - `tasks` - List tasks, optionally by status
//! - `call` - Call any endpoint
//! - `locate` - Parse a Deep Intelligence URL

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
