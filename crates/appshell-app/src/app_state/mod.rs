//! Application state and the UI thread.
//!
//! `AppContext` is the shared half used by the control plane on any thread.
//! `WindowHost` is the UI-thread half that owns native surfaces. The two talk
//! only through the [`dispatch`] queue.

mod commands;
mod core;
pub mod dispatch;
mod factory;
pub mod headless;
pub mod host;
mod init;
#[cfg(feature = "native")]
pub mod native;
pub mod services;
pub mod shutdown;

pub use self::core::AppContext;
pub use commands::{resident_name, with_query_param, HOME_WINDOW, NOTIFY_WINDOW};
pub use dispatch::{ui_channel, UiContext, UiDispatcher, UiQueue};
pub use host::{DragOutcome, WindowHost};
