//! Display and source-chain access for Error
//!
//! `Display` covers this error only. Sources are reached through
//! `std::error::Error::source`, which the formatter turns into cause blocks,
//! so they are not repeated in the text.

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get_context() {
            Some(context) => write!(f, "{}: {context}", self.kind()),
            None => fmt::Display::fmt(self.kind(), f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source: &(dyn std::error::Error + 'static) = self.inner.source.as_deref()?;
        Some(source)
    }
}
