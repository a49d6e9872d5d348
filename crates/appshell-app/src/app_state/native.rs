//! Native UI thread: a winit event loop owning one borderless window and
//! one wry engine per surface.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use appshell_common::{EngineId, Rect, ShellError, SurfaceError};
use appshell_webview::engine;
use appshell_webview::{
    EngineEnvironment, EventSink, NativeSurface, SurfaceFactory, SurfaceSnapshot,
};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId, WindowLevel};

use super::dispatch::{UiQueue, Waker};
use super::host::WindowHost;

/// User event that wakes the loop when UI jobs are queued.
#[derive(Debug, Clone, Copy)]
pub struct UiWake;

/// Build the event loop the UI thread runs on.
pub fn event_loop() -> Result<EventLoop<UiWake>, ShellError> {
    EventLoop::<UiWake>::with_user_event()
        .build()
        .map_err(|e| ShellError::Other(format!("failed to create event loop: {e}")))
}

/// Waker that posts [`UiWake`] into `event_loop`.
pub fn waker(event_loop: &EventLoop<UiWake>) -> Waker {
    let proxy = Mutex::new(event_loop.create_proxy());
    Arc::new(move || {
        if let Ok(proxy) = proxy.lock() {
            let _ = proxy.send_event(UiWake);
        }
    })
}

/// Run the event loop on the calling thread until exit is requested.
pub fn run(
    event_loop: EventLoop<UiWake>,
    queue: UiQueue,
    host: WindowHost,
) -> Result<(), ShellError> {
    let mut app = NativeApp {
        queue,
        host,
        window_ids: HashMap::new(),
        resumed: false,
    };
    tracing::info!("entering event loop");
    event_loop
        .run_app(&mut app)
        .map_err(|e| ShellError::Other(format!("event loop error: {e}")))
}

struct NativeApp {
    queue: UiQueue,
    host: WindowHost,
    /// Which engine lives in which native window.
    window_ids: HashMap<WindowId, EngineId>,
    resumed: bool,
}

impl NativeApp {
    fn pump(&mut self, event_loop: &ActiveEventLoop) {
        if !self.resumed {
            return;
        }
        let mut factory = NativeSurfaceFactory {
            event_loop,
            window_ids: &mut self.window_ids,
        };
        self.queue.drain(&mut self.host, &mut factory);

        if self.host.exit_requested() {
            self.host.shutdown();
            self.window_ids.clear();
            event_loop.exit();
        }
    }
}

impl ApplicationHandler<UiWake> for NativeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        self.resumed = true;
        self.pump(event_loop);
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, _event: UiWake) {
        self.pump(event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                let window = self
                    .window_ids
                    .get(&window_id)
                    .and_then(|engine| self.host.window_for_engine(*engine));
                match window {
                    Some(window) => {
                        tracing::debug!(%window, "native close requested");
                        self.host.close(window);
                    }
                    None => tracing::debug!(?window_id, "close requested on an idle window"),
                }
                self.pump(event_loop);
            }
            WindowEvent::Destroyed => {
                self.window_ids.remove(&window_id);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.pump(event_loop);
    }
}

// =============================================================================
// SURFACES
// =============================================================================

/// Builds surfaces while the event loop is active. Lives only for one drain.
struct NativeSurfaceFactory<'a> {
    event_loop: &'a ActiveEventLoop,
    window_ids: &'a mut HashMap<WindowId, EngineId>,
}

impl SurfaceFactory for NativeSurfaceFactory<'_> {
    fn initialize(&mut self, env: &EngineEnvironment) -> Result<(), SurfaceError> {
        engine::apply_environment(env)
    }

    fn create(
        &mut self,
        id: EngineId,
        events: EventSink,
    ) -> Result<Box<dyn NativeSurface>, SurfaceError> {
        let attributes = Window::default_attributes()
            .with_title("")
            .with_decorations(false)
            .with_visible(false);
        let window = self
            .event_loop
            .create_window(attributes)
            .map_err(|e| SurfaceError::Window(e.to_string()))?;
        let webview = engine::build_engine(&window, id, events)?;

        self.window_ids.insert(window.id(), id);
        Ok(Box::new(NativeWindowSurface::new(webview, window)))
    }
}

/// One borderless winit window hosting one wry engine.
struct NativeWindowSurface {
    // Dropped before the window it is attached to.
    webview: wry::WebView,
    window: Window,
    url: String,
    title: String,
    topmost: bool,
    topmost_raises: u32,
    focus_count: u32,
    drag_count: u32,
    last_script: Option<String>,
}

impl NativeWindowSurface {
    fn new(webview: wry::WebView, window: Window) -> Self {
        Self {
            webview,
            window,
            url: "about:blank".into(),
            title: String::new(),
            topmost: false,
            topmost_raises: 0,
            focus_count: 0,
            drag_count: 0,
            last_script: None,
        }
    }
}

fn engine_error(e: wry::Error) -> SurfaceError {
    SurfaceError::Engine(e.to_string())
}

impl NativeSurface for NativeWindowSurface {
    fn navigate(&mut self, url: &str) -> Result<(), SurfaceError> {
        self.webview.load_url(url).map_err(engine_error)?;
        self.url = url.to_string();
        Ok(())
    }

    fn reset(&mut self) -> Result<(), SurfaceError> {
        self.window.set_visible(false);
        self.window.set_maximized(false);
        self.set_topmost(false);
        self.set_title("");
        self.last_script = None;
        self.navigate("about:blank")
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
        self.title = title.to_string();
    }

    fn set_bounds(&mut self, bounds: Rect) {
        let position = PhysicalPosition::new(bounds.x.round() as i32, bounds.y.round() as i32);
        self.window.set_outer_position(position);
        let size = PhysicalSize::new(
            bounds.width.max(1.0).round() as u32,
            bounds.height.max(1.0).round() as u32,
        );
        let _ = self.window.request_inner_size(size);
    }

    fn bounds(&self) -> Rect {
        let position = self.window.outer_position().unwrap_or_default();
        let size = self.window.outer_size();
        Rect::new(
            f64::from(position.x),
            f64::from(position.y),
            f64::from(size.width),
            f64::from(size.height),
        )
    }

    fn work_area(&self) -> Rect {
        match self.window.current_monitor() {
            Some(monitor) => {
                let position = monitor.position();
                let size = monitor.size();
                Rect::new(
                    f64::from(position.x),
                    f64::from(position.y),
                    f64::from(size.width),
                    f64::from(size.height),
                )
            }
            None => self.bounds(),
        }
    }

    fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    fn show(&mut self) {
        self.window.set_visible(true);
    }

    fn hide(&mut self) {
        self.window.set_visible(false);
    }

    fn set_topmost(&mut self, topmost: bool) {
        let level = if topmost {
            self.topmost_raises += 1;
            WindowLevel::AlwaysOnTop
        } else {
            WindowLevel::Normal
        };
        self.window.set_window_level(level);
        self.topmost = topmost;
    }

    fn focus(&mut self) {
        self.window.focus_window();
        self.focus_count += 1;
    }

    fn set_maximized(&mut self, maximized: bool) {
        self.window.set_maximized(maximized);
    }

    fn is_maximized(&self) -> bool {
        self.window.is_maximized()
    }

    fn set_minimized(&mut self, minimized: bool) {
        self.window.set_minimized(minimized);
    }

    fn begin_drag(&mut self) -> Result<(), SurfaceError> {
        self.window
            .drag_window()
            .map_err(|e| SurfaceError::Window(e.to_string()))?;
        self.drag_count += 1;
        Ok(())
    }

    fn evaluate_script(&mut self, script: &str) -> Result<(), SurfaceError> {
        self.webview.evaluate_script(script).map_err(engine_error)?;
        self.last_script = Some(script.to_string());
        Ok(())
    }

    fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            url: self.url.clone(),
            title: self.title.clone(),
            bounds: self.bounds(),
            visible: self.window.is_visible().unwrap_or(false),
            maximized: self.window.is_maximized(),
            minimized: self.window.is_minimized().unwrap_or(false),
            topmost: self.topmost,
            topmost_raises: self.topmost_raises,
            focus_count: self.focus_count,
            drag_count: self.drag_count,
            last_script: self.last_script.clone(),
        }
    }
}
