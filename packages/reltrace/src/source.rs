//! Source-line lookup

use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex, PoisonError};

/// Looks up the literal source text of a line.
pub trait LineSource: Send + Sync {
    /// Text of 1-based line `lineno` in `filename`, if retrievable
    fn line(&self, filename: &str, lineno: u32) -> Option<String>;
}

impl<F> LineSource for F
where
    F: Fn(&str, u32) -> Option<String> + Send + Sync,
{
    fn line(&self, filename: &str, lineno: u32) -> Option<String> {
        self(filename, lineno)
    }
}

/// Reads source files from disk, caching each file's lines.
///
/// Unreadable files are cached as absent so they are only tried once.
#[derive(Debug, Default)]
pub struct FileLineCache {
    files: Mutex<HashMap<String, Option<Arc<Vec<String>>>>>,
}

impl FileLineCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every cached file
    pub fn clear(&self) {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn lines_of(&self, filename: &str) -> Option<Arc<Vec<String>>> {
        let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        files
            .entry(filename.to_owned())
            .or_insert_with(|| {
                fs::read_to_string(filename)
                    .ok()
                    .map(|text| Arc::new(text.lines().map(str::to_owned).collect()))
            })
            .clone()
    }
}

impl LineSource for FileLineCache {
    fn line(&self, filename: &str, lineno: u32) -> Option<String> {
        let index = usize::try_from(lineno).ok()?.checked_sub(1)?;
        self.lines_of(filename)?.get(index).cloned()
    }
}
