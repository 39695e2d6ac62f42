//! Entry points: printing helpers, the panic hook and `Report`

use crate::config::FormatOptions;
use crate::exception::Exception;
use crate::formatter::Formatter;
use crate::frame::{RawFrame, Traceback};
use crate::handling::current_exception;
use reltrace_common::{LoggingTransformer, Result};
use std::any::Any;
use std::fmt;
use std::io::{self, Write};
use std::panic::{self, PanicHookInfo};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;

/// Type name of exceptions built from panics.
pub const PANIC_TYPE_NAME: &str = "Panic";

/// Formatter installed by the last call to [`install_with`].
static INSTALLED: RwLock<Option<Arc<Formatter>>> = RwLock::new(None);

/// Print `exception` with the relative-path formatter.
///
/// `out` defaults to standard error.
pub fn print_exception(
    exception: &Exception,
    limit: Option<isize>,
    out: Option<&mut dyn Write>,
    chain: bool,
) -> Result<()> {
    let formatter = Formatter::new(FormatOptions::default().limit(limit).chain(chain));
    match out {
        Some(out) => formatter.write_exception(exception, out),
        None => formatter.write_exception(exception, &mut io::stderr().lock()),
    }
}

/// Print the exception currently being handled on this thread.
///
/// Does nothing when no exception is being handled.
pub fn print_current_exception(
    limit: Option<isize>,
    out: Option<&mut dyn Write>,
    chain: bool,
) -> Result<()> {
    match current_exception() {
        Some(exception) => print_exception(&exception, limit, out, chain),
        None => Ok(()),
    }
}

/// Install the default relative-path formatter as the panic hook
pub fn install_as_default_handler() {
    install_with(Formatter::default());
}

/// Install `formatter` as the panic hook and as the formatter used by
/// [`Report`]. Panics are written to standard error.
///
/// Replaces whatever hook was set before; the last installation wins.
pub fn install_with(formatter: Formatter) {
    install_to(formatter, io::stderr);
}

/// Like [`install_with`], writing each panic to a stream from `make_output`
pub fn install_to<W, F>(formatter: Formatter, make_output: F)
where
    W: Write,
    F: Fn() -> W + Send + Sync + 'static,
{
    let formatter = Arc::new(formatter);
    *INSTALLED.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&formatter));
    panic::set_hook(Box::new(move |info| {
        report_panic(&formatter, info, &mut make_output());
    }));
    LoggingTransformer::log_handler_installed("relative traceback formatter");
}

/// The formatter set by [`install_with`], or a default one
#[must_use]
pub fn installed_formatter() -> Arc<Formatter> {
    INSTALLED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .unwrap_or_default()
}

fn report_panic(formatter: &Formatter, info: &PanicHookInfo<'_>, out: &mut dyn Write) {
    log::debug!(
        "Reporting panic on thread {}",
        thread::current().name().unwrap_or("<unnamed>")
    );
    let exception = panic_exception(info);
    if let Err(error) = formatter.write_exception(&exception, out) {
        LoggingTransformer::log_write_failure("panic output", &error);
    }
}

/// Build the exception for a panic observed by the hook
#[inline(never)]
fn panic_exception(info: &PanicHookInfo<'_>) -> Exception {
    let mut traceback = Traceback::capture();
    if traceback.is_empty() {
        if let Some(location) = info.location() {
            traceback = Traceback::from_frames([RawFrame::new(
                location.file(),
                location.line(),
                "<unknown>",
            )]);
        }
    }
    Exception::builder(PANIC_TYPE_NAME, payload_message(info.payload()))
        .traceback(traceback)
        .build()
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_owned()
    }
}

/// An error report that renders as a relative traceback.
///
/// Returning it from `main` prints the traceback when an error propagates
/// out of the program:
///
/// ```no_run
/// fn main() -> Result<(), reltrace::Report> {
///     reltrace::install_as_default_handler();
///     std::fs::read_to_string("missing.toml")?;
///     Ok(())
/// }
/// ```
pub struct Report {
    exception: Exception,
}

impl Report {
    /// Wrap an exception
    #[must_use]
    pub fn new(exception: Exception) -> Self {
        Self { exception }
    }

    /// The wrapped exception
    #[must_use]
    pub fn exception(&self) -> &Exception {
        &self.exception
    }
}

impl From<Exception> for Report {
    fn from(exception: Exception) -> Self {
        Self::new(exception)
    }
}

impl<E> From<E> for Report
where
    E: std::error::Error + 'static,
{
    #[inline(never)]
    fn from(error: E) -> Self {
        Self::new(Exception::from_error(&error))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.exception, f)
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatter = installed_formatter();
        let record = formatter.record(&self.exception);
        for line in formatter.format(&record) {
            f.write_str(&line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payloads_render_as_text() {
        assert_eq!(payload_message(&"boom"), "boom");
        assert_eq!(payload_message(&String::from("owned")), "owned");
        assert_eq!(payload_message(&42_u8), "Box<dyn Any>");
    }
}
