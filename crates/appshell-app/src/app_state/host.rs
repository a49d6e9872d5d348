//! UI-thread window state.
//!
//! `WindowHost` owns every native surface and the engine token held by each
//! open window. It lives on the UI thread and is only reached through UI jobs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use appshell_common::{
    EngineId, EventBus, Placement, ShellEvent, SurfaceError, WindowId, WindowMode,
};
use appshell_webview::bootstrap::identity_script;
use appshell_webview::{
    EngineEvent, EngineInstance, EnginePool, EventSink, NativeSurface, PageLoadState,
    SurfaceSnapshot, WindowRegistry,
};
use tracing::{debug, info, warn};

/// Two drag requests closer than this toggle maximize instead.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(500);

struct HostedWindow {
    engine: EngineInstance,
    mode: WindowMode,
    last_drag: Option<Instant>,
}

/// What a drag request turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Dragged,
    Maximized,
    Restored,
    Unknown,
}

pub struct WindowHost {
    registry: Arc<WindowRegistry>,
    pool: EnginePool,
    bus: EventBus,
    events: EventSink,
    api_base: String,
    surfaces: HashMap<EngineId, Box<dyn NativeSurface>>,
    windows: HashMap<WindowId, HostedWindow>,
    exit_requested: bool,
}

impl WindowHost {
    pub fn new(
        registry: Arc<WindowRegistry>,
        pool: EnginePool,
        bus: EventBus,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            pool,
            bus,
            events: EventSink::new(),
            api_base: api_base.into(),
            surfaces: HashMap::new(),
            windows: HashMap::new(),
            exit_requested: false,
        }
    }

    /// Sink that engine callbacks should report to.
    pub fn events(&self) -> EventSink {
        self.events.clone()
    }

    /// Take ownership of a freshly built, hidden surface.
    pub fn adopt_surface(&mut self, id: EngineId, surface: Box<dyn NativeSurface>) {
        debug!(engine = %id, "surface adopted");
        self.surfaces.insert(id, surface);
    }

    // =========================================================================
    // OPEN / CLOSE
    // =========================================================================

    /// Bind `engine` to a registered window, navigate, place and optionally
    /// show it. If the window was closed while its engine was being acquired,
    /// or the surface refuses to load, the engine goes back to the pool. The
    /// identity script is injected once the page finishes loading.
    pub fn open(
        &mut self,
        id: WindowId,
        engine: EngineInstance,
        url: &str,
        placement: &Placement,
        visible: bool,
    ) -> Result<(), SurfaceError> {
        let Some(entry) = self.registry.resolve(id) else {
            debug!(window = %id, "window closed before its engine arrived");
            self.recycle(engine);
            return Ok(());
        };
        let engine_id = engine.id();
        if let Err(e) = self.load(engine_id, url, placement) {
            warn!(window = %id, engine = %engine_id, error = %e, "open failed");
            self.recycle(engine);
            return Err(e);
        }

        self.registry.attach_engine(id, engine_id);
        self.windows.insert(
            id,
            HostedWindow {
                engine,
                mode: entry.mode,
                last_drag: None,
            },
        );
        if visible {
            self.show(id);
        }

        info!(window = %id, engine = %engine_id, url, "window opened");
        self.bus.publish(ShellEvent::WindowOpened(id));
        Ok(())
    }

    fn load(
        &mut self,
        engine: EngineId,
        url: &str,
        placement: &Placement,
    ) -> Result<(), SurfaceError> {
        let surface = self
            .surfaces
            .get_mut(&engine)
            .ok_or_else(|| SurfaceError::NotFound(engine.to_string()))?;

        surface.navigate(url)?;
        if !placement.is_empty() {
            let bounds = placement.resolve(
                surface.bounds(),
                surface.work_area(),
                surface.scale_factor(),
            );
            surface.set_bounds(bounds);
        }
        Ok(())
    }

    /// Close a window. Normal windows are unregistered and their engine is
    /// reset and returned to the pool; Singleton windows are only hidden.
    /// Returns `false` for unknown windows.
    pub fn close(&mut self, id: WindowId) -> bool {
        let Some(entry) = self.registry.resolve(id) else {
            return false;
        };

        match entry.mode {
            WindowMode::Singleton => {
                if let Some(surface) = self.surface_mut(id) {
                    surface.hide();
                }
                debug!(window = %id, "singleton window hidden");
                self.bus.publish(ShellEvent::WindowHidden(id));
            }
            WindowMode::Normal => {
                self.registry.unregister(id);
                if let Some(hosted) = self.windows.remove(&id) {
                    self.recycle(hosted.engine);
                }
                info!(window = %id, "window closed");
                self.bus.publish(ShellEvent::WindowClosed(id));
            }
        }
        true
    }

    /// Reset a surface and hand its engine back to the pool. An engine whose
    /// surface cannot be reset is dropped instead of being reused.
    fn recycle(&mut self, engine: EngineInstance) {
        let engine_id = engine.id();
        match self.surfaces.get_mut(&engine_id).map(|s| s.reset()) {
            Some(Ok(())) => self.pool.release(engine),
            Some(Err(e)) => {
                warn!(engine = %engine_id, error = %e, "engine reset failed, discarding");
                self.surfaces.remove(&engine_id);
            }
            None => warn!(engine = %engine_id, "no surface for released engine"),
        }
    }

    // =========================================================================
    // WINDOW STATE
    // =========================================================================

    /// Bring a window to the front: visible, briefly topmost, focused.
    pub fn show(&mut self, id: WindowId) -> bool {
        let Some(surface) = self.surface_mut(id) else {
            return false;
        };
        surface.set_minimized(false);
        surface.show();
        surface.set_topmost(true);
        surface.set_topmost(false);
        surface.focus();
        true
    }

    pub fn maximize(&mut self, id: WindowId) -> bool {
        match self.surface_mut(id) {
            Some(surface) => {
                surface.set_maximized(true);
                true
            }
            None => false,
        }
    }

    pub fn minimize(&mut self, id: WindowId) -> bool {
        match self.surface_mut(id) {
            Some(surface) => {
                surface.set_minimized(true);
                true
            }
            None => false,
        }
    }

    /// Start a caption drag, or toggle maximize when the previous request
    /// for the same window was less than [`DOUBLE_CLICK_WINDOW`] ago.
    pub fn mouse_down_drag(&mut self, id: WindowId, now: Instant) -> DragOutcome {
        let Some(hosted) = self.windows.get_mut(&id) else {
            return DragOutcome::Unknown;
        };
        let double = hosted
            .last_drag
            .is_some_and(|prev| now.saturating_duration_since(prev) < DOUBLE_CLICK_WINDOW);
        hosted.last_drag = if double { None } else { Some(now) };
        let engine_id = hosted.engine.id();

        let Some(surface) = self.surfaces.get_mut(&engine_id) else {
            return DragOutcome::Unknown;
        };
        if double {
            let maximize = !surface.is_maximized();
            surface.set_maximized(maximize);
            if maximize {
                DragOutcome::Maximized
            } else {
                DragOutcome::Restored
            }
        } else {
            if let Err(e) = surface.begin_drag() {
                warn!(window = %id, error = %e, "drag failed");
            }
            DragOutcome::Dragged
        }
    }

    pub fn snapshot(&self, id: WindowId) -> Option<SurfaceSnapshot> {
        let hosted = self.windows.get(&id)?;
        self.surfaces.get(&hosted.engine.id()).map(|s| s.snapshot())
    }

    /// Window that currently holds `engine`.
    pub fn window_for_engine(&self, engine: EngineId) -> Option<WindowId> {
        self.windows
            .iter()
            .find(|(_, hosted)| hosted.engine.id() == engine)
            .map(|(id, _)| *id)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Surfaces built so far, in use or idle.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    // =========================================================================
    // ENGINE EVENTS
    // =========================================================================

    /// Apply queued engine callbacks: mirror document titles onto the native
    /// window and re-inject the identity script after each finished load.
    pub fn process_engine_events(&mut self) {
        for event in self.events.drain() {
            let Some(window) = self.window_for_engine(event.engine()) else {
                continue;
            };
            let api_base = self.api_base.clone();
            let Some(surface) = self.surface_mut(window) else {
                continue;
            };
            match event {
                EngineEvent::TitleChanged { title, .. } => surface.set_title(&title),
                EngineEvent::PageLoad {
                    state: PageLoadState::Finished,
                    ..
                } => {
                    if let Err(e) = surface.evaluate_script(&identity_script(window, &api_base)) {
                        warn!(%window, error = %e, "identity injection failed");
                    }
                }
                EngineEvent::PageLoad { .. } => {}
            }
        }
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Hide every window and drop all surfaces. Runs once on the UI thread as
    /// the loop stops.
    pub fn shutdown(&mut self) {
        for surface in self.surfaces.values_mut() {
            surface.hide();
        }
        let count = self.surfaces.len();
        self.windows.clear();
        self.surfaces.clear();
        info!(surfaces = count, "window host shut down");
    }

    fn surface_mut(&mut self, id: WindowId) -> Option<&mut Box<dyn NativeSurface>> {
        let engine = self.windows.get(&id)?.engine.id();
        self.surfaces.get_mut(&engine)
    }
}
