//! Navigation engine
//!
//! The engine is a single tokio task owning a [`Navigator`]. Callers talk to
//! it through a cloneable [`EngineHandle`]; every request is a message, so
//! requests are applied strictly one after another.
//!
//! Fetches run as separate tasks. Their results come back into the engine
//! loop as messages and are applied there; the fetch tasks never touch the
//! navigation state. A fetch whose request was superseded by a later
//! navigation is discarded on arrival.
//!
//! ```text
//! EngineHandle ──Command──▶ engine loop ──spawn──▶ FolderSource fetch
//!      ▲                       │   ▲                      │
//!      └──────reply────────────┘   └──────Fetched─────────┘
//!                              │
//!                              └──▶ NavigationObserver
//! ```

mod error;
mod fetch;
mod navigator;
mod observer;

pub use error::EngineError;
pub use fetch::{FolderSource, SourceError};
pub use navigator::{Completion, ExploreStep, FetchTicket, Navigator, RootTicket};
pub use observer::{ChannelObserver, EngineEvent, NavigationObserver, NullObserver};

use crate::entry::FileEntry;
use crate::sort::SortMode;
use crate::stack::Page;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

const DEFAULT_COMMAND_BUFFER: usize = 32;

/// How a navigation request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The folder was already open; nothing changed
    Unchanged,
    /// The stack changed without a fetch
    Reused,
    /// The folder was fetched and pushed
    Fetched,
    /// The fetch failed; the error went to the observer and nothing changed
    FetchFailed,
    /// A later navigation request made this one obsolete
    Superseded,
}

/// Point-in-time copy of the engine state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub pages: Vec<Page>,
    /// Open tokens, sorted
    pub open_tokens: Vec<String>,
    /// Cached tokens, sorted
    pub cached_tokens: Vec<String>,
    pub sort_mode: SortMode,
    pub reversed: bool,
}

/// Engine construction parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Sort mode for newly fetched pages until the first re-sort
    pub sort_mode: SortMode,
    /// Reversal flag for newly fetched pages until the first re-sort
    pub reversed: bool,
    /// Capacity of the request queue
    pub command_buffer: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            sort_mode: SortMode::default(),
            reversed: false,
            command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }
}

type Reply<T> = oneshot::Sender<Result<T, EngineError>>;

enum Command {
    Explore {
        folder: FileEntry,
        requested_level: usize,
        force_refresh: bool,
        reply: Reply<NavOutcome>,
    },
    CreateRoot {
        reply: Reply<NavOutcome>,
    },
    Sort {
        mode: SortMode,
        reversed: bool,
        target_level: usize,
        reply: Reply<()>,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
    Shutdown,
}

enum Fetched {
    Root {
        ticket: RootTicket,
        result: Result<String, SourceError>,
        reply: Reply<NavOutcome>,
    },
    Folder {
        ticket: FetchTicket,
        result: Result<Vec<FileEntry>, SourceError>,
        reply: Reply<NavOutcome>,
    },
}

/// Engine task state
pub struct NavigationEngine<S> {
    navigator: Navigator,
    source: Arc<S>,
    observer: Box<dyn NavigationObserver>,
    commands: mpsc::Receiver<Command>,
    in_flight: JoinSet<Fetched>,
}

impl<S: FolderSource + 'static> NavigationEngine<S> {
    /// Spawn the engine on the current tokio runtime
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<O: NavigationObserver>(
        source: S,
        observer: O,
        settings: EngineSettings,
    ) -> EngineHandle {
        let (tx, rx) = mpsc::channel(settings.command_buffer.max(1));
        let engine = Self {
            navigator: Navigator::new(settings.sort_mode, settings.reversed),
            source: Arc::new(source),
            observer: Box::new(observer),
            commands: rx,
            in_flight: JoinSet::new(),
        };
        tokio::spawn(engine.run());
        EngineHandle { commands: tx }
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    match command {
                        Some(Command::Shutdown) | None => break,
                        Some(command) => self.handle_command(command),
                    }
                }
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    match joined {
                        Ok(fetched) => self.handle_fetched(fetched),
                        Err(err) => warn!(error = %err, "fetch task did not complete"),
                    }
                }
            }
        }
        debug!(in_flight = self.in_flight.len(), "navigation engine stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Explore {
                folder,
                requested_level,
                force_refresh,
                reply,
            } => match self.navigator.explore(&folder, requested_level, force_refresh) {
                Ok(step) => self.advance(step, reply),
                Err(err) => {
                    let _ = reply.send(Err(err));
                }
            },
            Command::CreateRoot { reply } => {
                let ticket = self.navigator.begin_root();
                let source = Arc::clone(&self.source);
                self.in_flight.spawn(async move {
                    let result = source.fetch_root_token().await;
                    Fetched::Root {
                        ticket,
                        result,
                        reply,
                    }
                });
            }
            Command::Sort {
                mode,
                reversed,
                target_level,
                reply,
            } => {
                let result = self.navigator.sort(mode, reversed, target_level);
                if result.is_ok() {
                    self.publish();
                }
                let _ = reply.send(result);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            Command::Shutdown => {}
        }
    }

    fn advance(&mut self, step: ExploreStep, reply: Reply<NavOutcome>) {
        match step {
            ExploreStep::Unchanged => {
                let _ = reply.send(Ok(NavOutcome::Unchanged));
            }
            ExploreStep::Reused => {
                self.publish();
                let _ = reply.send(Ok(NavOutcome::Reused));
            }
            ExploreStep::Fetch(ticket) => {
                let source = Arc::clone(&self.source);
                self.in_flight.spawn(async move {
                    let result = source.fetch_folder_contents(&ticket.token).await;
                    Fetched::Folder {
                        ticket,
                        result,
                        reply,
                    }
                });
            }
        }
    }

    fn handle_fetched(&mut self, fetched: Fetched) {
        match fetched {
            Fetched::Root {
                ticket,
                result: Ok(token),
                reply,
            } => match self.navigator.resolve_root(ticket, &token) {
                Ok(Some(step)) => {
                    info!(token = %token, "resolved root folder");
                    self.advance(step, reply);
                }
                Ok(None) => {
                    let _ = reply.send(Ok(NavOutcome::Superseded));
                }
                Err(err) => {
                    let _ = reply.send(Err(err));
                }
            },
            Fetched::Root {
                ticket,
                result: Err(err),
                reply,
            } => {
                let current = self.navigator.root_is_current(ticket);
                self.fail(current, err, reply);
            }
            Fetched::Folder {
                ticket,
                result: Ok(listing),
                reply,
            } => {
                let token = ticket.token.clone();
                match self.navigator.complete_fetch(ticket, listing) {
                    Ok(Completion::Applied) => {
                        self.publish();
                        let _ = reply.send(Ok(NavOutcome::Fetched));
                    }
                    Ok(Completion::Superseded) => {
                        let _ = reply.send(Ok(NavOutcome::Superseded));
                    }
                    Err(err) => {
                        error!(token = %token, error = %err, "navigation bookkeeping violated");
                        let _ = reply.send(Err(err));
                    }
                }
            }
            Fetched::Folder {
                ticket,
                result: Err(err),
                reply,
            } => {
                let current = self.navigator.ticket_is_current(&ticket);
                self.fail(current, err, reply);
            }
        }
    }

    fn fail(&self, current: bool, err: SourceError, reply: Reply<NavOutcome>) {
        if !current {
            debug!(error = %err, "discarding failure of superseded fetch");
            let _ = reply.send(Ok(NavOutcome::Superseded));
            return;
        }
        warn!(error = %err, "fetch failed, navigation state unchanged");
        let error = EngineError::Fetch(err);
        self.observer.on_error(&error);
        let _ = reply.send(Ok(NavOutcome::FetchFailed));
    }

    fn publish(&self) {
        self.observer.on_stack_changed(self.navigator.pages());
    }

    fn snapshot(&self) -> Snapshot {
        let mut open_tokens: Vec<String> = self.navigator.open_tokens().iter().cloned().collect();
        open_tokens.sort_unstable();
        let (sort_mode, reversed) = self.navigator.sort_state();
        Snapshot {
            pages: self.navigator.pages().to_vec(),
            open_tokens,
            cached_tokens: self
                .navigator
                .cache()
                .tokens()
                .into_iter()
                .map(str::to_string)
                .collect(),
            sort_mode,
            reversed,
        }
    }
}

/// Cloneable request surface of a running engine
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
}

impl EngineHandle {
    /// Show `folder` after the first `requested_level` pages
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotAFolder` for file entries, `EngineError::Cache`
    /// on bookkeeping violations and `EngineError::Stopped` if the engine is
    /// gone. Fetch failures are not errors here; they resolve to
    /// `NavOutcome::FetchFailed`.
    pub async fn explore(
        &self,
        folder: FileEntry,
        requested_level: usize,
    ) -> Result<NavOutcome, EngineError> {
        self.navigate(folder, requested_level, false).await
    }

    /// Like [`EngineHandle::explore`], but always refetches `folder`
    ///
    /// # Errors
    ///
    /// See [`EngineHandle::explore`].
    pub async fn refresh(
        &self,
        folder: FileEntry,
        requested_level: usize,
    ) -> Result<NavOutcome, EngineError> {
        self.navigate(folder, requested_level, true).await
    }

    /// Resolve the root token and show the root as the only page
    ///
    /// # Errors
    ///
    /// See [`EngineHandle::explore`].
    pub async fn create_root(&self) -> Result<NavOutcome, EngineError> {
        self.request(|reply| Command::CreateRoot { reply }).await?
    }

    /// Re-sort the page at 0-based `target_level`
    ///
    /// # Errors
    ///
    /// Returns `EngineError::LevelOutOfRange` if no page exists at that level.
    pub async fn sort(
        &self,
        mode: SortMode,
        reversed: bool,
        target_level: usize,
    ) -> Result<(), EngineError> {
        self.request(|reply| Command::Sort {
            mode,
            reversed,
            target_level,
            reply,
        })
        .await?
    }

    /// Copy of the current engine state
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Stopped` if the engine is gone.
    pub async fn snapshot(&self) -> Result<Snapshot, EngineError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Current pages, root first
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Stopped` if the engine is gone.
    pub async fn pages(&self) -> Result<Vec<Page>, EngineError> {
        self.snapshot().await.map(|s| s.pages)
    }

    /// Stop the engine; outstanding requests resolve to `EngineError::Stopped`
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Stopped` if the engine is already gone.
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        self.commands
            .send(Command::Shutdown)
            .await
            .map_err(|_| EngineError::Stopped)
    }

    async fn navigate(
        &self,
        folder: FileEntry,
        requested_level: usize,
        force_refresh: bool,
    ) -> Result<NavOutcome, EngineError> {
        self.request(|reply| Command::Explore {
            folder,
            requested_level,
            force_refresh,
            reply,
        })
        .await?
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, EngineError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(command(tx))
            .await
            .map_err(|_| EngineError::Stopped)?;
        rx.await.map_err(|_| EngineError::Stopped)
    }
}
