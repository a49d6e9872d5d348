pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{ConfigError, DispatchError, PoolError, ShellError, SurfaceError};
pub use events::{EventBus, ShellEvent};
pub use id::{EngineId, WindowId};
pub use types::{Anchor, Dimension, Placement, Rect, WindowMode};

pub type Result<T> = std::result::Result<T, ShellError>;
