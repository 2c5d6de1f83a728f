//! Generic utility primitives with zero domain knowledge.
//!
//! - `shell` - Shell quoting for display
//! - `suggest` - Close-match suggestions for mistyped names
//! - `template` - `{{key}}` placeholder rendering

pub mod shell;
pub mod suggest;
pub mod template;
