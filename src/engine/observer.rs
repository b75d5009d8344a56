//! UI notification surface
//!
//! Observers are called from the engine task only, after the state change
//! they report has been applied.

use super::error::EngineError;
use crate::stack::Page;
use tokio::sync::mpsc;

/// Receiver of stack changes and fetch failures
pub trait NavigationObserver: Send + 'static {
    /// Called after every successful stack mutation with the full stack
    fn on_stack_changed(&self, pages: &[Page]);

    /// Called when a fetch fails; the stack is unchanged
    fn on_error(&self, error: &EngineError);
}

/// Notification forwarded by [`ChannelObserver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    StackChanged(Vec<Page>),
    Error(EngineError),
}

/// Observer forwarding every notification into an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl ChannelObserver {
    /// Create an observer and the receiving end of its channel
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { events }, rx)
    }
}

impl NavigationObserver for ChannelObserver {
    fn on_stack_changed(&self, pages: &[Page]) {
        // receiver gone means nobody is listening anymore
        let _ = self.events.send(EngineEvent::StackChanged(pages.to_vec()));
    }

    fn on_error(&self, error: &EngineError) {
        let _ = self.events.send(EngineEvent::Error(error.clone()));
    }
}

/// Observer that drops every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl NavigationObserver for NullObserver {
    fn on_stack_changed(&self, _pages: &[Page]) {}

    fn on_error(&self, _error: &EngineError) {}
}
