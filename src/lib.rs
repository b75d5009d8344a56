//! folder-pager - navigation and cache core for a paged file browser
//!
//! A remote filesystem is shown as a stack of folder pages. This library
//! tracks which pages are open, decides when a folder must be fetched and
//! when its cached page can be reused, and re-sorts pages under four sort
//! policies while keeping cache and stack consistent.
//!
//! The moving parts, leaf first:
//!
//! - [`entry`]: filesystem nodes
//! - [`sort`]: sort policies and the pure sort function
//! - [`cache`]: token-keyed page cache
//! - [`stack`]: visible page stack
//! - [`engine`]: the navigation state machine and its async task

use thiserror::Error;

pub mod cache;
pub mod cli;
pub mod config;
pub mod engine;
pub mod entry;
pub mod output;
pub mod sort;
pub mod source;
pub mod stack;
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum PagerError {
    /// Navigation engine error
    #[error("Navigation error: {0}")]
    EngineError(#[from] engine::EngineError),
    /// Folder source error
    #[error("Source error: {0}")]
    SourceError(#[from] engine::SourceError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// JSON output error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
