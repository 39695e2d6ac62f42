//! Formatter switches

use reltrace_common::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Repeat count beyond which identical consecutive frames are collapsed.
pub const RECURSIVE_CUTOFF: usize = 3;

/// Switches controlling how tracebacks are captured and rendered.
///
/// Deserializes with defaults for missing fields, so it can be embedded in
/// an application's own configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// `n >= 0` keeps the first `n` frames, `n < 0` the last `|n|`
    pub limit: Option<isize>,
    /// Read source lines from disk for the rendered frames
    pub lookup_lines: bool,
    /// Render local-variable snapshots when frames carry them
    pub capture_locals: bool,
    /// Render cause and context blocks
    pub chain: bool,
    /// See [`RECURSIVE_CUTOFF`]
    pub recursive_cutoff: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            limit: None,
            lookup_lines: true,
            capture_locals: false,
            chain: true,
            recursive_cutoff: RECURSIVE_CUTOFF,
        }
    }
}

impl FormatOptions {
    /// Parse and validate options from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject settings the renderer cannot honor
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.recursive_cutoff >= 1,
            configuration,
            "recursive_cutoff must be at least 1, got {}",
            self.recursive_cutoff
        );
        Ok(())
    }

    /// Set the frame limit
    #[must_use]
    pub fn limit(mut self, limit: Option<isize>) -> Self {
        self.limit = limit;
        self
    }

    /// Enable or disable source-line lookup
    #[must_use]
    pub fn lookup_lines(mut self, lookup_lines: bool) -> Self {
        self.lookup_lines = lookup_lines;
        self
    }

    /// Enable or disable locals rendering
    #[must_use]
    pub fn capture_locals(mut self, capture_locals: bool) -> Self {
        self.capture_locals = capture_locals;
        self
    }

    /// Enable or disable chained exception blocks
    #[must_use]
    pub fn chain(mut self, chain: bool) -> Self {
        self.chain = chain;
        self
    }

    /// Set the repeat cutoff
    #[must_use]
    pub fn recursive_cutoff(mut self, cutoff: usize) -> Self {
        self.recursive_cutoff = cutoff;
        self
    }
}
