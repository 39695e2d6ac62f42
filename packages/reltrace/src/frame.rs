//! Call-chain capture and per-frame summaries

use backtrace::Backtrace;
use std::collections::BTreeMap;
use std::fmt;

/// Function-name prefixes of frames that belong to capture or panic
/// machinery rather than to the code that raised.
const INTERNAL_PREFIXES: &[&str] = &[
    "backtrace::",
    "reltrace::",
    "<reltrace::",
    "<alloc::boxed::Box<",
    "<core::result::Result<",
    "std::panicking::",
    "core::panicking::",
    "std::sys::backtrace::",
    "std::sys_common::backtrace::",
    "rust_begin_unwind",
    "__rustc::",
];

/// Marker of the runtime frame that starts user code on every thread.
const RUNTIME_BOUNDARY: &str = "__rust_begin_short_backtrace";

/// Closure-call shim sitting between the runtime boundary and user code.
const CALL_SHIM: &str = "core::ops::function::FnOnce::call_once";

/// One entry of a raw call chain, as captured or as supplied by an
/// embedding runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Source file as recorded in debug info
    pub filename: String,
    /// 1-based line number
    pub lineno: u32,
    /// Enclosing function or scope name
    pub name: String,
    /// Textual snapshot of local variables, if the runtime can provide one
    pub locals: Option<Vec<(String, String)>>,
}

impl RawFrame {
    /// Create a frame without locals
    pub fn new(filename: impl Into<String>, lineno: u32, name: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            lineno,
            name: name.into(),
            locals: None,
        }
    }

    /// Attach a locals snapshot; values are rendered with their `Debug` form
    #[must_use]
    pub fn with_locals<I, K, V>(mut self, locals: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: fmt::Debug,
    {
        self.locals = Some(
            locals
                .into_iter()
                .map(|(name, value)| (name.into(), format!("{value:?}")))
                .collect(),
        );
        self
    }
}

/// A raw call chain, outermost call first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traceback {
    frames: Vec<RawFrame>,
}

impl Traceback {
    /// Build a traceback from frames ordered outermost first
    pub fn from_frames(frames: impl IntoIterator<Item = RawFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Capture the calling thread's call chain
    ///
    /// Frames of the capture and panic machinery are dropped from the inner
    /// end and runtime start-up frames from the outer end.
    #[inline(never)]
    #[must_use]
    pub fn capture() -> Self {
        let backtrace = Backtrace::new();
        let mut frames = trim_machinery(resolved_frames(&backtrace));
        frames.reverse();
        Self { frames }
    }

    /// Convert an already captured backtrace, keeping every resolved frame
    #[must_use]
    pub fn from_backtrace(backtrace: &Backtrace) -> Self {
        let mut frames = resolved_frames(backtrace);
        frames.reverse();
        Self { frames }
    }

    /// Frames, outermost call first
    #[must_use]
    pub fn frames(&self) -> &[RawFrame] {
        &self.frames
    }

    /// Number of frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frame could be captured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Drop runtime start-up frames (and the call shims that enter user code
/// from them) at the outer end, then capture and panic machinery at the
/// inner end. Takes and returns frames innermost first.
fn trim_machinery(mut innermost_first: Vec<RawFrame>) -> Vec<RawFrame> {
    if let Some(boundary) = innermost_first
        .iter()
        .position(|frame| frame.name.contains(RUNTIME_BOUNDARY))
    {
        innermost_first.truncate(boundary);
        while innermost_first
            .last()
            .is_some_and(|frame| frame.name.starts_with(CALL_SHIM))
        {
            innermost_first.pop();
        }
    }
    let internal = innermost_first
        .iter()
        .take_while(|frame| is_internal(&frame.name))
        .count();
    innermost_first.drain(..internal);
    innermost_first
}

fn is_internal(name: &str) -> bool {
    INTERNAL_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Resolved frames innermost first. Inlined calls expand into one frame per
/// symbol; symbols without a file or line are skipped.
fn resolved_frames(backtrace: &Backtrace) -> Vec<RawFrame> {
    backtrace
        .frames()
        .iter()
        .flat_map(|frame| frame.symbols())
        .filter_map(|symbol| {
            let filename = symbol.filename()?;
            let lineno = symbol.lineno()?;
            let name = symbol
                .name()
                .map_or_else(|| "<unknown>".to_owned(), |name| format!("{name:#}"));
            Some(RawFrame::new(filename.display().to_string(), lineno, name))
        })
        .collect()
}

/// One rendered call-stack entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSummary {
    /// Source file exactly as captured
    pub filename: String,
    /// 1-based line number
    pub lineno: u32,
    /// Enclosing function or scope name
    pub name: String,
    /// Locals sorted by name, present only when capture was requested
    pub locals: Option<BTreeMap<String, String>>,
    line: Option<String>,
}

impl FrameSummary {
    /// Create a summary without source text or locals
    pub fn new(filename: impl Into<String>, lineno: u32, name: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            lineno,
            name: name.into(),
            locals: None,
            line: None,
        }
    }

    /// Summarize a raw frame, keeping its locals only when asked to
    #[must_use]
    pub fn from_raw(raw: &RawFrame, capture_locals: bool) -> Self {
        let locals = raw
            .locals
            .as_ref()
            .filter(|_| capture_locals)
            .map(|locals| locals.iter().cloned().collect());
        Self {
            filename: raw.filename.clone(),
            lineno: raw.lineno,
            name: raw.name.clone(),
            locals,
            line: None,
        }
    }

    /// Set the source text of this frame
    #[must_use]
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.set_line(Some(line.into()));
        self
    }

    /// The stripped source line, absent when unknown or blank
    #[must_use]
    pub fn line(&self) -> Option<&str> {
        self.line.as_deref()
    }

    pub(crate) fn set_line(&mut self, line: Option<String>) {
        self.line = line
            .map(|line| line.trim().to_owned())
            .filter(|line| !line.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_prefixes_cover_capture_and_panic_machinery() {
        assert!(is_internal("backtrace::backtrace::trace"));
        assert!(is_internal("reltrace::frame::Traceback::capture"));
        assert!(is_internal("core::panicking::panic_fmt"));
        assert!(!is_internal("app::load_config"));
        assert!(!is_internal("core::result::unwrap_failed"));
    }

    #[test]
    fn machinery_is_trimmed_from_both_ends() {
        let innermost_first = [
            "backtrace::backtrace::trace",
            "reltrace::frame::Traceback::capture",
            "app::load",
            "app::main",
            "core::ops::function::FnOnce::call_once",
            "core::ops::function::FnOnce::call_once",
            "std::sys::backtrace::__rust_begin_short_backtrace",
            "std::rt::lang_start_internal",
        ]
        .into_iter()
        .enumerate()
        .map(|(n, name)| RawFrame::new("src/main.rs", n as u32 + 1, name))
        .collect();

        let names: Vec<String> = trim_machinery(innermost_first)
            .into_iter()
            .map(|frame| frame.name)
            .collect();

        assert_eq!(names, ["app::load", "app::main"]);
    }

    #[test]
    fn call_shims_are_kept_without_a_boundary() {
        let frames = vec![
            RawFrame::new("src/main.rs", 3, "app::main"),
            RawFrame::new("function.rs", 250, "core::ops::function::FnOnce::call_once"),
        ];

        assert_eq!(trim_machinery(frames.clone()), frames);
    }

    #[test]
    fn blank_source_lines_are_absent() {
        let mut frame = FrameSummary::new("main.rs", 3, "main");
        frame.set_line(Some("   \n".to_owned()));
        assert_eq!(frame.line(), None);

        let frame = frame.with_line("    let x = 1;\n");
        assert_eq!(frame.line(), Some("let x = 1;"));
    }
}
