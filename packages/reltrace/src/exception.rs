//! Exception model: one error occurrence with its call chain and links

use crate::frame::Traceback;
use crate::handling::current_exception;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Type name given to errors reached through `source()` chains, whose
/// concrete type is erased.
const ERASED_TYPE_NAME: &str = "Error";

/// What kind of error an exception is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExceptionKind {
    /// Any error without extra rendering fields
    #[default]
    Generic,
    /// A parse error pointing at offending source text
    Syntax(SyntaxDetails),
}

/// Location and text carried by a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyntaxDetails {
    /// Offending file
    pub filename: Option<String>,
    /// 1-based line number
    pub lineno: Option<u32>,
    /// Offending source text
    pub text: Option<String>,
    /// 1-based column of the error within `text`
    pub offset: Option<usize>,
    /// Parser message
    pub msg: Option<String>,
}

/// An error occurrence, cheap to clone and shared by identity.
///
/// Cause and context links can be set once after construction, which also
/// allows pathological self-references; formatting guards against them.
#[derive(Clone)]
pub struct Exception {
    inner: Arc<ExceptionInner>,
}

struct ExceptionInner {
    type_name: String,
    message: String,
    kind: ExceptionKind,
    traceback: Option<Traceback>,
    cause: OnceCell<Exception>,
    context: OnceCell<Exception>,
    suppress_context: AtomicBool,
}

/// Builder for [`Exception`].
#[derive(Debug)]
pub struct ExceptionBuilder {
    type_name: String,
    message: String,
    kind: ExceptionKind,
    traceback: Option<Traceback>,
    cause: Option<Exception>,
    context: Option<Exception>,
    implicit_context: bool,
}

impl ExceptionBuilder {
    /// Set the exception kind
    #[must_use]
    pub fn kind(mut self, kind: ExceptionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Use a supplied call chain
    #[must_use]
    pub fn traceback(mut self, traceback: Traceback) -> Self {
        self.traceback = Some(traceback);
        self
    }

    /// Capture the calling thread's call chain
    #[inline(never)]
    #[must_use]
    pub fn capture(mut self) -> Self {
        self.traceback = Some(Traceback::capture());
        self
    }

    /// Link an explicit cause; the context is then not displayed
    #[must_use]
    pub fn cause(mut self, cause: Exception) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Link an explicit context instead of the implicit one
    #[must_use]
    pub fn context(mut self, context: Exception) -> Self {
        self.context = Some(context);
        self
    }

    /// Do not pick up the exception currently being handled as context
    #[must_use]
    pub fn no_implicit_context(mut self) -> Self {
        self.implicit_context = false;
        self
    }

    /// Finish the exception
    #[must_use]
    pub fn build(self) -> Exception {
        let context = self
            .context
            .or_else(|| self.implicit_context.then(current_exception).flatten());
        let exception = Exception {
            inner: Arc::new(ExceptionInner {
                type_name: self.type_name,
                message: self.message,
                kind: self.kind,
                traceback: self.traceback,
                cause: OnceCell::new(),
                context: OnceCell::new(),
                suppress_context: AtomicBool::new(false),
            }),
        };
        if let Some(context) = context {
            exception.set_context(context);
        }
        if let Some(cause) = self.cause {
            exception.set_cause(cause);
        }
        exception
    }
}

impl Exception {
    /// Start building an exception without a call chain
    pub fn builder(type_name: impl Into<String>, message: impl Into<String>) -> ExceptionBuilder {
        ExceptionBuilder {
            type_name: type_name.into(),
            message: message.into(),
            kind: ExceptionKind::Generic,
            traceback: None,
            cause: None,
            context: None,
            implicit_context: true,
        }
    }

    /// Raise-style constructor: captures the call chain and the implicit context
    #[inline(never)]
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::builder(type_name, message).capture().build()
    }

    /// A `SyntaxError` carrying parse details
    #[inline(never)]
    #[must_use]
    pub fn syntax(details: SyntaxDetails) -> Self {
        let message = details.msg.clone().unwrap_or_default();
        Self::builder("SyntaxError", message)
            .kind(ExceptionKind::Syntax(details))
            .capture()
            .build()
    }

    /// Convert a standard error; its `source()` chain becomes the cause chain
    ///
    /// Workspace errors are routed through [`Exception::from_common_error`].
    #[inline(never)]
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::error::Error + 'static,
    {
        let erased: &(dyn std::error::Error + 'static) = error;
        if let Some(common) = erased.downcast_ref::<reltrace_common::Error>() {
            return Self::from_common_error(common);
        }
        let builder = Self::builder(std::any::type_name::<E>(), error.to_string()).capture();
        match error.source() {
            Some(source) => builder.cause(Self::from_source(source)).build(),
            None => builder.build(),
        }
    }

    /// Convert a workspace error, using the backtrace it captured when created
    #[must_use]
    pub fn from_common_error(error: &reltrace_common::Error) -> Self {
        let builder = Self::builder("reltrace_common::Error", error.to_string())
            .traceback(Traceback::from_backtrace(error.backtrace()))
            .no_implicit_context();
        match std::error::Error::source(error) {
            Some(source) => builder.cause(Self::from_source(source)).build(),
            None => builder.build(),
        }
    }

    fn from_source(error: &(dyn std::error::Error + 'static)) -> Self {
        if let Some(common) = error.downcast_ref::<reltrace_common::Error>() {
            return Self::from_common_error(common);
        }
        let builder = Self::builder(ERASED_TYPE_NAME, error.to_string()).no_implicit_context();
        match error.source() {
            Some(source) => builder.cause(Self::from_source(source)).build(),
            None => builder.build(),
        }
    }

    /// Link `cause` as the direct cause and hide the context, returning self
    #[must_use]
    pub fn caused_by(self, cause: Exception) -> Self {
        self.set_cause(cause);
        self
    }

    /// Link the direct cause and hide the context.
    ///
    /// Returns `false` and changes nothing if a cause was already linked.
    pub fn set_cause(&self, cause: Exception) -> bool {
        let linked = self.inner.cause.set(cause).is_ok();
        if linked {
            self.set_suppress_context(true);
        }
        linked
    }

    /// Link the context. Returns `false` if one was already linked.
    pub fn set_context(&self, context: Exception) -> bool {
        self.inner.context.set(context).is_ok()
    }

    /// Show or hide the context link when formatting
    pub fn set_suppress_context(&self, suppress: bool) {
        self.inner.suppress_context.store(suppress, Ordering::Relaxed);
    }

    /// Type name shown on the final line
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.inner.type_name
    }

    /// Message shown after the type name
    #[must_use]
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Generic or parse error
    #[must_use]
    pub fn kind(&self) -> &ExceptionKind {
        &self.inner.kind
    }

    /// The call chain captured for this exception
    #[must_use]
    pub fn traceback(&self) -> Option<&Traceback> {
        self.inner.traceback.as_ref()
    }

    /// The direct cause
    #[must_use]
    pub fn cause(&self) -> Option<&Exception> {
        self.inner.cause.get()
    }

    /// The exception being handled when this one was raised
    #[must_use]
    pub fn context(&self) -> Option<&Exception> {
        self.inner.context.get()
    }

    /// Whether the context link is hidden
    #[must_use]
    pub fn suppress_context(&self) -> bool {
        self.inner.suppress_context.load(Ordering::Relaxed)
    }

    /// Identity shared by all clones of this exception
    #[must_use]
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// Whether both handles refer to the same exception
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message().is_empty() {
            f.write_str(self.type_name())
        } else {
            write!(f, "{}: {}", self.type_name(), self.message())
        }
    }
}

// Links may form cycles, so only their presence is shown.
impl fmt::Debug for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exception")
            .field("type_name", &self.inner.type_name)
            .field("message", &self.inner.message)
            .field("kind", &self.inner.kind)
            .field(
                "frames",
                &self.inner.traceback.as_ref().map_or(0, Traceback::len),
            )
            .field("cause", &self.cause().map(Exception::type_name))
            .field("context", &self.context().map(Exception::type_name))
            .field("suppress_context", &self.suppress_context())
            .finish()
    }
}
