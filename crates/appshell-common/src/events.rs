use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::id::WindowId;

/// Lifecycle notifications published by the window host and control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ShellEvent {
    WindowOpened(WindowId),
    WindowClosed(WindowId),
    WindowHidden(WindowId),
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ShellEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShellEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Returns the number of subscribers that saw it.
    pub fn publish(&self, event: ShellEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}
