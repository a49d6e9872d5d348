//! The UI-thread side of a window: one native window plus its engine.
//!
//! Surfaces are not `Send`. They are created and driven only from the UI
//! thread; other threads refer to them through [`EngineId`].

use appshell_common::{EngineId, Rect, SurfaceError};
use serde::Serialize;

use crate::events::EventSink;
use crate::types::EngineEnvironment;

/// Native window + engine operations used by the window host.
pub trait NativeSurface {
    fn navigate(&mut self, url: &str) -> Result<(), SurfaceError>;

    /// Return to a neutral state before going back to the pool: blank page,
    /// hidden, not maximized, not topmost.
    fn reset(&mut self) -> Result<(), SurfaceError>;

    fn set_title(&mut self, title: &str);
    fn set_bounds(&mut self, bounds: Rect);
    fn bounds(&self) -> Rect;

    /// Usable area of the monitor the window is on.
    fn work_area(&self) -> Rect;
    fn scale_factor(&self) -> f64;

    fn show(&mut self);
    fn hide(&mut self);
    fn set_topmost(&mut self, topmost: bool);
    fn focus(&mut self);
    fn set_maximized(&mut self, maximized: bool);
    fn is_maximized(&self) -> bool;
    fn set_minimized(&mut self, minimized: bool);

    /// Start an OS-driven move, as if the caption had been grabbed.
    fn begin_drag(&mut self) -> Result<(), SurfaceError>;

    fn evaluate_script(&mut self, script: &str) -> Result<(), SurfaceError>;

    fn snapshot(&self) -> SurfaceSnapshot;
}

/// Builds surfaces on the UI thread.
pub trait SurfaceFactory {
    /// Apply the shared engine environment. Runs before any `create`.
    fn initialize(&mut self, env: &EngineEnvironment) -> Result<(), SurfaceError>;

    /// Build a hidden window with a ready engine. Engine callbacks report to
    /// `events` tagged with `id`.
    fn create(
        &mut self,
        id: EngineId,
        events: EventSink,
    ) -> Result<Box<dyn NativeSurface>, SurfaceError>;
}

/// Observable state of a surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SurfaceSnapshot {
    pub url: String,
    pub title: String,
    pub bounds: Rect,
    pub visible: bool,
    pub maximized: bool,
    pub minimized: bool,
    pub topmost: bool,
    /// Times the topmost flag was switched on.
    pub topmost_raises: u32,
    pub focus_count: u32,
    pub drag_count: u32,
    pub last_script: Option<String>,
}
