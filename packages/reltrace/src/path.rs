//! Render-time path shortening

use std::borrow::Cow;
use std::env;
use std::path::{Path, PathBuf};

/// Decides how a frame's file path is displayed.
pub trait PathStyle: Send + Sync {
    /// Display form of `filename`
    fn render<'a>(&self, filename: &'a str) -> Cow<'a, str>;
}

/// Shows paths under a base directory as `./`-prefixed relative paths.
///
/// Without an explicit base the process working directory is read on every
/// render. Paths outside the base, relative paths, paths on another root,
/// and an unreadable working directory all leave the path untouched.
#[derive(Debug, Clone, Default)]
pub struct RelativeToCwd {
    base: Option<PathBuf>,
}

impl RelativeToCwd {
    /// Relative to the working directory at render time
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative to a fixed directory
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }
}

impl PathStyle for RelativeToCwd {
    fn render<'a>(&self, filename: &'a str) -> Cow<'a, str> {
        let relative = match &self.base {
            Some(base) => relative_to(filename, base),
            None => env::current_dir()
                .ok()
                .and_then(|cwd| relative_to(filename, &cwd)),
        };
        relative.map_or(Cow::Borrowed(filename), Cow::Owned)
    }
}

/// Leaves every path as captured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl PathStyle for Verbatim {
    fn render<'a>(&self, filename: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(filename)
    }
}

/// `./`-prefixed form of `path` relative to `base`, if `path` lies inside it
#[must_use]
pub fn relative_to(path: &str, base: &Path) -> Option<String> {
    let relative = Path::new(path).strip_prefix(base).ok()?;
    if relative.as_os_str().is_empty() {
        Some("./.".to_owned())
    } else {
        Some(format!("./{}", relative.display()))
    }
}
