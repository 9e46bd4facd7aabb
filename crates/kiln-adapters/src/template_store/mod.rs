//! Template store adapters.
//!
//! - [`BuiltinStore`]: templates compiled into the binary
//! - [`DirectoryStore`]: per-project overrides on disk, falling back to built-ins
//! - [`InMemoryStore`]: mutable store for tests and embedding

mod builtin;
mod directory;
mod memory;

pub use builtin::BuiltinStore;
pub use directory::DirectoryStore;
pub use memory::InMemoryStore;
