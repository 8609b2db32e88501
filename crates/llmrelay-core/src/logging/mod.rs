//! Logging abstractions for runtime-agnostic logging
//!
//! Components take an `Arc<dyn Logger>` and tag their lines with a
//! bracketed component name, e.g. `[RotatingClient]`.

mod console;
mod memory;
mod traits;

pub use console::ConsoleLogger;
pub use memory::MemoryLogger;
pub use traits::{Level, Logger, NoOpLogger};
