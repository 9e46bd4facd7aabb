//! Infrastructure adapters for Kiln.
//!
//! This crate implements the ports defined in `kiln_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod formatter;
pub mod renderer;
pub mod template_store;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use formatter::{CommandFormatter, NoopFormatter};
pub use renderer::{BlockRenderer, EscapeMode};
pub use template_store::{BuiltinStore, DirectoryStore, InMemoryStore};
