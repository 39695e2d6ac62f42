//! Common infrastructure for the reltrace workspace
//!
//! This crate provides shared functionality used by the formatter crate:
//! - Error handling with context propagation
//! - Backtrace capture on internal errors
//! - Logging bootstrap built on `env_logger`

pub mod error;

pub use error::*;
