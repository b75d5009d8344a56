//! folder-pager CLI application entry point
//!
//! Drives the navigation engine over a local directory tree. The directory
//! plays the role of the remote filesystem: its path is the root token and
//! every child path is a folder token.
//!
//! # Usage
//!
//! ```bash
//! # Show the root page of a directory
//! folder-pager browse ~/projects
//!
//! # Descend into child folders by name, sorted by modification time
//! folder-pager browse ~/projects --into rust --into engine --sort lmt
//!
//! # Machine-readable output
//! folder-pager browse ~/projects --json
//!
//! # Change the default sort mode
//! folder-pager config set-sort typed-lmt --reverse
//! ```
//!
//! # Configuration
//!
//! Configuration is stored in the user's config directory
//! (`~/.config/folder-pager/config.toml` on Linux). Logging goes to stderr;
//! `RUST_LOG` overrides the configured filter.

use folder_pager::{
    PagerError,
    cli::{Cli, Commands, ConfigCommands},
    config::PagerConfig,
    engine::{ChannelObserver, EngineEvent, EngineHandle, NavOutcome, NavigationEngine},
    output,
    source::LocalSource,
};
use std::path::Path;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, PagerError>;

/// Install the stderr tracing subscriber
///
/// `-v`/`-vv` raise the configured level; `RUST_LOG` wins over both.
fn init_logging(configured: &str, verbose: u8) {
    let level = match verbose {
        0 => configured,
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Turn a failed navigation into the error the observer received
fn check_outcome(outcome: NavOutcome, events: &mut UnboundedReceiver<EngineEvent>) -> Result<()> {
    if outcome != NavOutcome::FetchFailed {
        return Ok(());
    }
    while let Ok(event) = events.try_recv() {
        if let EngineEvent::Error(err) = event {
            return Err(err.into());
        }
    }
    Err(PagerError::InvalidInput("navigation failed".to_string()))
}

/// Open the root page, descend through `into` and return the page titles
async fn open_stack(
    handle: &EngineHandle,
    events: &mut UnboundedReceiver<EngineEvent>,
    root: &Path,
    into: &[String],
) -> Result<Vec<String>> {
    check_outcome(handle.create_root().await?, events)?;
    let mut titles = vec![root.display().to_string()];

    for name in into {
        let pages = handle.pages().await?;
        let level = pages.len();
        let target = pages
            .last()
            .and_then(|leaf| leaf.folders().find(|e| e.display_name() == name.as_str()))
            .cloned()
            .ok_or_else(|| PagerError::InvalidInput(format!("No folder named '{name}'")))?;

        info!(name = %name, level, "descending");
        check_outcome(handle.explore(target, level).await?, events)?;
        titles.push(name.clone());
    }

    Ok(titles)
}

async fn browse(
    config: &PagerConfig,
    root: &Path,
    into: &[String],
    json: bool,
    quiet: bool,
) -> Result<()> {
    let source = LocalSource::new(root, config.show_hidden)?;
    let (observer, mut events) = ChannelObserver::new();
    let handle = NavigationEngine::spawn(source, observer, config.engine_settings());

    let result = open_stack(&handle, &mut events, root, into).await;
    let pages = handle.pages().await?;
    handle.shutdown().await?;
    let titles = result?;

    if json {
        println!("{}", output::stack_json(&pages)?);
    } else {
        print!("{}", output::format_stack(&pages, &titles, quiet));
    }
    Ok(())
}

fn show_config(config: &PagerConfig) -> Result<()> {
    println!("Config file: {}", PagerConfig::config_path()?.display());
    println!("  sort_mode   = {}", config.sort_mode);
    println!("  reversed    = {}", config.reversed);
    println!("  log_level   = {}", config.log_level);
    println!("  show_hidden = {}", config.show_hidden);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = PagerConfig::load()?;
    init_logging(&config.log_level, cli.verbose);

    match cli.command {
        Commands::Browse {
            root,
            into,
            sort,
            reverse,
            hidden,
            json,
        } => {
            if let Some(mode) = sort {
                config.sort_mode = mode;
            }
            config.reversed |= reverse;
            config.show_hidden |= hidden;
            browse(&config, &root, &into, json, cli.quiet).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => show_config(&config),
            ConfigCommands::SetSort { mode, reverse } => {
                config.sort_mode = mode;
                config.reversed = reverse;
                config.save()?;
                if !cli.quiet {
                    println!("Default sort set to {mode}{}", if reverse { " (reversed)" } else { "" });
                }
                Ok(())
            }
        },
    }
}
