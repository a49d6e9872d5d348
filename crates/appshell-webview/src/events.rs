//! Engine event types.
//!
//! Engine callbacks fire on the UI thread while a surface is being driven.
//! They are queued on an [`EventSink`] and drained by the window host after
//! every batch of UI work.

use std::sync::{Arc, Mutex, PoisonError};

use appshell_common::EngineId;
use serde::{Deserialize, Serialize};

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    /// Navigation has started.
    Started,
    /// Page has fully loaded.
    Finished,
}

#[cfg(feature = "native")]
impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// Events emitted by an engine instance.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Page load state changed. Carries the URL.
    PageLoad {
        engine: EngineId,
        state: PageLoadState,
        url: String,
    },
    /// Document title changed.
    TitleChanged { engine: EngineId, title: String },
}

impl EngineEvent {
    pub fn engine(&self) -> EngineId {
        match self {
            EngineEvent::PageLoad { engine, .. } | EngineEvent::TitleChanged { engine, .. } => {
                *engine
            }
        }
    }
}

/// Shared queue that engine callbacks push into.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: EngineEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&self) -> Vec<EngineEvent> {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_events_in_order_and_empties_queue() {
        let sink = EventSink::new();
        let clone = sink.clone();
        clone.push(EngineEvent::TitleChanged {
            engine: EngineId(1),
            title: "a".into(),
        });
        clone.push(EngineEvent::PageLoad {
            engine: EngineId(2),
            state: PageLoadState::Finished,
            url: "about:blank".into(),
        });

        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].engine(), EngineId(1));
        assert_eq!(drained[1].engine(), EngineId(2));
        assert!(sink.drain().is_empty());
    }
}
