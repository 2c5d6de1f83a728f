// Public modules
pub mod app;
pub mod classify;
pub mod command;
pub mod console;
pub mod defaults;
pub mod dispatch;
pub mod docker;
pub mod error;
pub mod hooks;
pub mod lifecycle;
pub mod npm;
pub mod npm_local;
pub mod paths;
pub mod process;
pub mod registry;
pub mod runner;
pub mod sync;
pub mod target;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
