//! In-memory surfaces with no native window.
//!
//! Used by `--headless` runs and by tests. Navigation completes immediately
//! and reports the same page-load events a real engine would.

use appshell_common::{EngineId, Rect, SurfaceError};
use tracing::trace;

use crate::events::{EngineEvent, EventSink, PageLoadState};
use crate::surface::{NativeSurface, SurfaceFactory, SurfaceSnapshot};
use crate::types::EngineEnvironment;

pub struct HeadlessSurface {
    id: EngineId,
    events: EventSink,
    work_area: Rect,
    state: SurfaceSnapshot,
}

impl HeadlessSurface {
    pub fn new(id: EngineId, events: EventSink, work_area: Rect) -> Self {
        Self {
            id,
            events,
            work_area,
            state: SurfaceSnapshot {
                url: "about:blank".into(),
                ..Default::default()
            },
        }
    }
}

impl NativeSurface for HeadlessSurface {
    fn navigate(&mut self, url: &str) -> Result<(), SurfaceError> {
        trace!(engine = %self.id, url, "headless navigate");
        self.state.url = url.to_string();
        for state in [PageLoadState::Started, PageLoadState::Finished] {
            self.events.push(EngineEvent::PageLoad {
                engine: self.id,
                state,
                url: url.to_string(),
            });
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<(), SurfaceError> {
        self.state = SurfaceSnapshot {
            url: "about:blank".into(),
            bounds: self.state.bounds,
            ..Default::default()
        };
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.state.title = title.to_string();
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.state.bounds = bounds;
    }

    fn bounds(&self) -> Rect {
        self.state.bounds
    }

    fn work_area(&self) -> Rect {
        self.work_area
    }

    fn scale_factor(&self) -> f64 {
        1.0
    }

    fn show(&mut self) {
        self.state.visible = true;
        self.state.minimized = false;
    }

    fn hide(&mut self) {
        self.state.visible = false;
    }

    fn set_topmost(&mut self, topmost: bool) {
        if topmost && !self.state.topmost {
            self.state.topmost_raises += 1;
        }
        self.state.topmost = topmost;
    }

    fn focus(&mut self) {
        self.state.focus_count += 1;
    }

    fn set_maximized(&mut self, maximized: bool) {
        self.state.maximized = maximized;
    }

    fn is_maximized(&self) -> bool {
        self.state.maximized
    }

    fn set_minimized(&mut self, minimized: bool) {
        self.state.minimized = minimized;
    }

    fn begin_drag(&mut self) -> Result<(), SurfaceError> {
        self.state.drag_count += 1;
        Ok(())
    }

    fn evaluate_script(&mut self, script: &str) -> Result<(), SurfaceError> {
        self.state.last_script = Some(script.to_string());
        Ok(())
    }

    fn snapshot(&self) -> SurfaceSnapshot {
        self.state.clone()
    }
}

/// Factory for [`HeadlessSurface`]s.
#[derive(Debug, Clone)]
pub struct HeadlessSurfaceFactory {
    work_area: Rect,
    initialized: bool,
}

impl HeadlessSurfaceFactory {
    pub fn new(work_area: Rect) -> Self {
        Self {
            work_area,
            initialized: false,
        }
    }
}

impl Default for HeadlessSurfaceFactory {
    fn default() -> Self {
        Self::new(Rect::new(0.0, 0.0, 1920.0, 1040.0))
    }
}

impl SurfaceFactory for HeadlessSurfaceFactory {
    fn initialize(&mut self, env: &EngineEnvironment) -> Result<(), SurfaceError> {
        trace!(user_data = %env.user_data_dir.display(), "headless environment");
        self.initialized = true;
        Ok(())
    }

    fn create(
        &mut self,
        id: EngineId,
        events: EventSink,
    ) -> Result<Box<dyn NativeSurface>, SurfaceError> {
        if !self.initialized {
            return Err(SurfaceError::Engine(
                "engine environment is not initialized".into(),
            ));
        }
        Ok(Box::new(HeadlessSurface::new(id, events, self.work_area)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_initialize() {
        let mut factory = HeadlessSurfaceFactory::default();
        assert!(factory.create(EngineId(1), EventSink::new()).is_err());

        factory
            .initialize(&EngineEnvironment::new("/tmp/profile"))
            .unwrap();
        assert!(factory.create(EngineId(1), EventSink::new()).is_ok());
    }

    #[test]
    fn navigate_reports_page_load() {
        let sink = EventSink::new();
        let mut surface = HeadlessSurface::new(EngineId(3), sink.clone(), Rect::default());
        surface.navigate("http://127.0.0.1:1/page").unwrap();

        let events = sink.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[1],
            EngineEvent::PageLoad { state: PageLoadState::Finished, url, .. }
                if url == "http://127.0.0.1:1/page"
        ));
        assert_eq!(surface.snapshot().url, "http://127.0.0.1:1/page");
    }

    #[test]
    fn reset_returns_to_blank_hidden_state() {
        let mut surface = HeadlessSurface::new(EngineId(1), EventSink::new(), Rect::default());
        surface.navigate("http://x/").unwrap();
        surface.show();
        surface.set_maximized(true);
        surface.set_title("X");

        surface.reset().unwrap();
        let snap = surface.snapshot();
        assert_eq!(snap.url, "about:blank");
        assert!(!snap.visible);
        assert!(!snap.maximized);
        assert!(snap.title.is_empty());
    }
}
