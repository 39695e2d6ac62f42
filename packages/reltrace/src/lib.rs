//! # reltrace - tracebacks with relative paths
//!
//! Renders an error, its call chain and every error chained to it in the
//! conventional traceback layout, showing source files under the working
//! directory as `./`-relative paths:
//!
//! ```text
//! Traceback (most recent call last):
//!   File "./src/main.rs", line 3, in app::main
//!     load("settings.toml")?;
//!   File "./src/config.rs", line 10, in app::config::load
//!     return Err(Exception::new("ValueError", "bad"));
//! ValueError: bad
//! ```
//!
//! ## Usage
//!
//! Install the formatter as the panic hook once at startup:
//!
//! ```no_run
//! reltrace::install_as_default_handler();
//! ```
//!
//! or inject a configured one:
//!
//! ```no_run
//! use reltrace::{FormatOptions, Formatter};
//!
//! let options = FormatOptions::default().limit(Some(-20));
//! reltrace::install_with(Formatter::new(options));
//! ```
//!
//! Exceptions link to a cause (`caused_by`) and to the exception that was
//! being handled when they were raised (`handling`):
//!
//! ```no_run
//! use reltrace::{handling, print_current_exception, Exception};
//!
//! let original = Exception::new("KeyError", "'port'");
//! handling(&original, || {
//!     let fallback = Exception::new("ValueError", "no default port");
//!     handling(&fallback, || print_current_exception(None, None, true))
//! })
//! .ok();
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod exception;
pub mod formatter;
pub mod frame;
pub mod handling;
pub mod install;
pub mod path;
pub mod record;
pub mod source;
pub mod stack;

pub use config::{FormatOptions, RECURSIVE_CUTOFF};
pub use exception::{Exception, ExceptionBuilder, ExceptionKind, SyntaxDetails};
pub use formatter::Formatter;
pub use frame::{FrameSummary, RawFrame, Traceback};
pub use handling::{current_exception, handling};
pub use install::{
    install_as_default_handler, install_to, install_with, installed_formatter,
    print_current_exception, print_exception, Report, PANIC_TYPE_NAME,
};
pub use path::{PathStyle, RelativeToCwd, Verbatim};
pub use record::TracebackRecord;
pub use source::{FileLineCache, LineSource};
pub use stack::{StackCapture, StackSummary, WalkCapture};

// Re-export the workspace error types
pub use reltrace_common::{Error, ErrorKind, LoggingTransformer, Result};
