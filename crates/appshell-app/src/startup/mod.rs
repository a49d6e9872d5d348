//! Process-level bootstrap that runs before any window opens: single
//! instance detection, environment directives and companion processes.

pub mod environment;
pub mod processes;
pub mod singleton;

pub use environment::apply_directives;
pub use processes::ChildProcesses;
pub use singleton::notify_running_instance;
