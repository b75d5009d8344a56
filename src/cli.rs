//! Command-line interface definitions and parsing
//!
//! Defines the `folder-pager` CLI using the `clap` crate.
//!
//! # Commands
//!
//! - **browse**: open a directory as the root page and drill down into
//!   child folders by name, printing the resulting page stack
//! - **config**: show or change the stored configuration

use crate::sort::SortMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Page-stack folder browser
#[derive(Parser, Debug)]
#[command(name = "folder-pager", version, about, long_about = None)]
pub struct Cli {
    /// Suppress headers and timestamps (only output names)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Browse a directory as a stack of folder pages
    #[command(visible_alias = "b")]
    Browse {
        /// Directory used as the filesystem root
        root: PathBuf,

        /// Child folder to descend into, by display name (repeatable)
        #[arg(short = 'i', long = "into", value_name = "NAME")]
        into: Vec<String>,

        /// Sort mode for the pages (typed-name, typed-lmt, name, lmt)
        #[arg(short, long)]
        sort: Option<SortMode>,

        /// Reverse the sort order
        #[arg(short, long)]
        reverse: bool,

        /// Include dot-files
        #[arg(long)]
        hidden: bool,

        /// Print the stack as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the current configuration
    Show,

    /// Set the default sort mode for new pages
    SetSort {
        /// Sort mode (typed-name, typed-lmt, name, lmt)
        mode: SortMode,

        /// Reverse new pages by default
        #[arg(short, long)]
        reverse: bool,
    },
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
