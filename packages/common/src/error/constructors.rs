//! Error constructors and methods

use super::types::{Error, ErrorInner, ErrorKind};
use std::fmt;
use std::sync::Arc;

impl Error {
    /// Create a new error with the given kind
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            inner: Arc::new(ErrorInner {
                kind,
                context: None,
                source: None,
                #[cfg(feature = "full-backtrace")]
                backtrace: backtrace::Backtrace::new(),
            }),
        }
    }

    /// Create an error with a source error
    #[must_use]
    pub fn with_source<E>(kind: ErrorKind, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(ErrorInner {
                kind,
                context: None,
                source: Some(Box::new(source)),
                #[cfg(feature = "full-backtrace")]
                backtrace: backtrace::Backtrace::new(),
            }),
        }
    }

    /// Add context to this error
    ///
    /// A fresh error without context is annotated in place; otherwise the
    /// original becomes the source of a new error of the same kind.
    #[must_use]
    pub fn context<C: fmt::Display>(self, context: C) -> Self {
        match Arc::try_unwrap(self.inner) {
            Ok(mut inner) if inner.context.is_none() => {
                inner.context = Some(context.to_string());
                Self {
                    inner: Arc::new(inner),
                }
            }
            Ok(inner) => Self::wrap(Self::from_inner(inner), context),
            Err(shared) => Self::wrap(Self { inner: shared }, context),
        }
    }

    fn from_inner(inner: ErrorInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    fn wrap<C: fmt::Display>(previous: Self, context: C) -> Self {
        Self {
            inner: Arc::new(ErrorInner {
                kind: previous.inner.kind.clone(),
                context: Some(context.to_string()),
                source: Some(Box::new(previous)),
                #[cfg(feature = "full-backtrace")]
                backtrace: backtrace::Backtrace::new(),
            }),
        }
    }

    /// Attach a message and the call site; used by the [`err!`](crate::err) macro
    #[doc(hidden)]
    #[must_use]
    pub fn located(self, message: fmt::Arguments<'_>, file: &str, line: u32) -> Self {
        let message = message.to_string();
        if message.is_empty() {
            self.context(format_args!("at {file}:{line}"))
        } else {
            self.context(format_args!("{message} at {file}:{line}"))
        }
    }

    /// Get the error kind
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }

    /// Get the error context if any
    #[must_use]
    pub fn get_context(&self) -> Option<&str> {
        self.inner.context.as_deref()
    }

    /// Get the backtrace
    #[cfg(feature = "full-backtrace")]
    #[must_use]
    pub fn backtrace(&self) -> &backtrace::Backtrace {
        &self.inner.backtrace
    }

    /// Create an I/O error
    #[must_use]
    pub fn io() -> Self {
        Self::new(ErrorKind::Io)
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Io, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorKind::Configuration, err)
    }
}
