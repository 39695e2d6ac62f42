//! The formatter: capture, path and line-lookup strategies plus options

use crate::config::FormatOptions;
use crate::exception::Exception;
use crate::path::{PathStyle, RelativeToCwd};
use crate::record::TracebackRecord;
use crate::source::{FileLineCache, LineSource};
use crate::stack::{StackCapture, WalkCapture};
use reltrace_common::Result;
use std::io::Write;

/// Renders exceptions as tracebacks.
///
/// The default formatter summarizes every frame, reads source lines from
/// disk and shows paths relative to the working directory.
pub struct Formatter {
    options: FormatOptions,
    capture: Box<dyn StackCapture>,
    paths: Box<dyn PathStyle>,
    lines: Box<dyn LineSource>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(FormatOptions::default())
    }
}

impl std::fmt::Debug for Formatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Formatter")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Formatter {
    /// Formatter with the default strategies and the given options
    #[must_use]
    pub fn new(options: FormatOptions) -> Self {
        Self {
            options,
            capture: Box::new(WalkCapture),
            paths: Box::new(RelativeToCwd::new()),
            lines: Box::new(FileLineCache::new()),
        }
    }

    /// Replace the stack-capture strategy
    #[must_use]
    pub fn with_capture(mut self, capture: impl StackCapture + 'static) -> Self {
        self.capture = Box::new(capture);
        self
    }

    /// Replace the path-rendering strategy
    #[must_use]
    pub fn with_path_style(mut self, paths: impl PathStyle + 'static) -> Self {
        self.paths = Box::new(paths);
        self
    }

    /// Replace the source-line lookup
    #[must_use]
    pub fn with_line_source(mut self, lines: impl LineSource + 'static) -> Self {
        self.lines = Box::new(lines);
        self
    }

    /// Options in effect
    #[must_use]
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Build the record tree for `exception` with this formatter's options
    #[must_use]
    pub fn record(&self, exception: &Exception) -> TracebackRecord {
        TracebackRecord::new(
            exception,
            &self.options,
            self.capture.as_ref(),
            self.lines.as_ref(),
        )
    }

    /// Lazily render a record built by [`Formatter::record`]
    pub fn format<'a>(&'a self, record: &'a TracebackRecord) -> impl Iterator<Item = String> + 'a {
        record.format(
            self.paths.as_ref(),
            self.options.recursive_cutoff,
            self.options.chain,
        )
    }

    /// Render `exception` into newline-terminated lines
    #[must_use]
    pub fn format_exception(&self, exception: &Exception) -> Vec<String> {
        let record = self.record(exception);
        self.format(&record).collect()
    }

    /// Write the rendering of `exception` to `out`
    pub fn write_exception(&self, exception: &Exception, out: &mut dyn Write) -> Result<()> {
        let record = self.record(exception);
        for line in self.format(&record) {
            out.write_all(line.as_bytes())?;
        }
        out.flush()?;
        Ok(())
    }
}
