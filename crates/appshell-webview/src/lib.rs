//! Browser engine management for appshell.
//!
//! - [`EnginePool`]: a FIFO pool of ready engine instances with demand-driven
//!   background creation
//! - [`WindowRegistry`]: identity and symbolic-name lookup for live windows
//! - [`NativeSurface`]: the UI-thread side of one window + engine pair, with a
//!   headless implementation for tests and `--headless` runs
//! - Engine events (title changes, page loads) and the identity bootstrap
//!   script injected into every page

pub mod bootstrap;
#[cfg(feature = "native")]
pub mod engine;
pub mod events;
pub mod headless;
pub mod pool;
pub mod registry;
pub mod surface;
pub mod types;

pub use events::{EngineEvent, EventSink, PageLoadState};
pub use headless::{HeadlessSurface, HeadlessSurfaceFactory};
pub use pool::{EngineFactory, EngineInstance, EnginePool, PoolSettings};
pub use registry::{WindowEntry, WindowRegistry};
pub use surface::{NativeSurface, SurfaceFactory, SurfaceSnapshot};
pub use types::EngineEnvironment;
