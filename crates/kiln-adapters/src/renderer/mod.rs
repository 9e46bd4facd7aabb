//! Template renderer adapters.

mod block;
pub mod syntax;

pub use block::{BlockRenderer, EscapeMode};
