//! Error handling with context propagation
//!
//! Provides the error type used across the workspace:
//! - Error chaining and context preservation
//! - Backtrace capture at construction
//! - Structured error kinds with thiserror
//! - `err!`/`bail!`/`ensure!` macros that attach file/line context

pub mod constructors;
pub mod display;
pub mod logging;
pub mod macros;
pub mod types;

// Re-export all public types
pub use logging::LoggingTransformer;
pub use types::{Error, ErrorKind, Result};
