//! UI-thread job queue.
//!
//! Native window handles and engine surfaces may only be touched from the
//! thread that owns the event loop. Everything else sends closures here via
//! [`UiDispatcher`]; the owning thread drains the [`UiQueue`].

use std::sync::mpsc;
use std::sync::Arc;

use appshell_common::DispatchError;
use appshell_webview::SurfaceFactory;
use tokio::sync::oneshot;

use super::host::WindowHost;

/// What a UI job can reach while it runs.
pub struct UiContext<'a> {
    pub host: &'a mut WindowHost,
    pub factory: &'a mut dyn SurfaceFactory,
}

pub type UiJob = Box<dyn FnOnce(&mut UiContext<'_>) + Send>;

/// Nudges the owning thread when a job is queued.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Sending half. Cheap to clone, usable from any thread.
#[derive(Clone)]
pub struct UiDispatcher {
    tx: mpsc::Sender<UiJob>,
    waker: Waker,
}

/// Receiving half, owned by the UI thread.
pub struct UiQueue {
    rx: mpsc::Receiver<UiJob>,
}

/// Create a connected dispatcher and queue.
pub fn ui_channel(waker: Waker) -> (UiDispatcher, UiQueue) {
    let (tx, rx) = mpsc::channel();
    (UiDispatcher { tx, waker }, UiQueue { rx })
}

impl UiDispatcher {
    /// Queue a job without waiting for it.
    pub fn post<F>(&self, job: F) -> Result<(), DispatchError>
    where
        F: FnOnce(&mut UiContext<'_>) + Send + 'static,
    {
        self.tx
            .send(Box::new(job))
            .map_err(|_| DispatchError::Disconnected)?;
        (self.waker)();
        Ok(())
    }

    /// Run a job on the UI thread and wait for its result.
    pub async fn invoke<F, R>(&self, job: F) -> Result<R, DispatchError>
    where
        F: FnOnce(&mut UiContext<'_>) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.post(move |cx| {
            let _ = tx.send(job(cx));
        })?;
        rx.await.map_err(|_| DispatchError::Dropped)
    }
}

impl UiQueue {
    /// Run every job queued so far, then flush engine events. Returns how
    /// many jobs ran.
    pub fn drain(&self, host: &mut WindowHost, factory: &mut dyn SurfaceFactory) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            let mut cx = UiContext {
                host: &mut *host,
                factory: &mut *factory,
            };
            job(&mut cx);
            ran += 1;
        }
        host.process_engine_events();
        ran
    }

    /// Own the calling thread until the host requests exit. Used when there
    /// is no native event loop. The pool's engine factory holds a dispatcher
    /// for as long as the host lives, so the queue never disconnects on its
    /// own; callers stop the thread with `WindowHost::request_exit`.
    pub fn run_blocking(self, mut host: WindowHost, mut factory: Box<dyn SurfaceFactory>) {
        tracing::debug!("ui thread started");
        while let Ok(job) = self.rx.recv() {
            {
                let mut cx = UiContext {
                    host: &mut host,
                    factory: factory.as_mut(),
                };
                job(&mut cx);
            }
            self.drain(&mut host, factory.as_mut());
            if host.exit_requested() {
                break;
            }
        }
        host.shutdown();
        tracing::debug!("ui thread stopped");
    }
}
