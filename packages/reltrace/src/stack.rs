//! Stack extraction and rendering

use crate::frame::{FrameSummary, RawFrame, Traceback};
use crate::path::PathStyle;
use crate::source::LineSource;

/// Turns a raw call chain into a [`StackSummary`].
pub trait StackCapture: Send + Sync {
    /// Summarize `traceback`, honoring `limit` and `capture_locals`
    fn extract(
        &self,
        traceback: &Traceback,
        limit: Option<isize>,
        capture_locals: bool,
    ) -> StackSummary;
}

/// Summarizes every selected frame in call order.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkCapture;

impl StackCapture for WalkCapture {
    fn extract(
        &self,
        traceback: &Traceback,
        limit: Option<isize>,
        capture_locals: bool,
    ) -> StackSummary {
        select_frames(traceback.frames(), limit)
            .iter()
            .map(|raw| FrameSummary::from_raw(raw, capture_locals))
            .collect()
    }
}

/// Apply a frame limit: non-negative keeps the outermost frames, negative
/// keeps the innermost.
fn select_frames(frames: &[RawFrame], limit: Option<isize>) -> &[RawFrame] {
    match limit {
        None => frames,
        Some(limit) if limit >= 0 => &frames[..limit.unsigned_abs().min(frames.len())],
        Some(limit) => &frames[frames.len() - limit.unsigned_abs().min(frames.len())..],
    }
}

/// Ordered frames of one exception, outermost call first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackSummary {
    frames: Vec<FrameSummary>,
}

impl FromIterator<FrameSummary> for StackSummary {
    fn from_iter<I: IntoIterator<Item = FrameSummary>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

impl StackSummary {
    /// Frames, outermost call first
    #[must_use]
    pub fn frames(&self) -> &[FrameSummary] {
        &self.frames
    }

    /// Number of frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the stack has no frames
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub(crate) fn load_lines(&mut self, lines: &dyn LineSource) {
        for frame in &mut self.frames {
            let line = lines.line(&frame.filename, frame.lineno);
            frame.set_line(line);
        }
    }

    /// Render the stack as newline-terminated lines.
    ///
    /// A run of frames with the same file, line and function prints its
    /// first `cutoff` frames; the rest are summarized in one
    /// `[Previous line repeated N more times]` line.
    #[must_use]
    pub fn format(&self, paths: &dyn PathStyle, cutoff: usize) -> Vec<String> {
        let mut result = Vec::new();
        let mut last: Option<(&str, u32, &str)> = None;
        let mut count = 0;

        for frame in &self.frames {
            let key = (frame.filename.as_str(), frame.lineno, frame.name.as_str());
            if last != Some(key) {
                push_repeat_summary(&mut result, count, cutoff);
                last = Some(key);
                count = 0;
            }
            count += 1;
            if count > cutoff {
                continue;
            }

            result.push(format!(
                "  File \"{}\", line {}, in {}\n",
                paths.render(&frame.filename),
                frame.lineno,
                frame.name
            ));
            if let Some(line) = frame.line() {
                result.push(format!("    {line}\n"));
            }
            if let Some(locals) = &frame.locals {
                for (name, value) in locals {
                    result.push(format!("    {name} = {value}\n"));
                }
            }
        }
        push_repeat_summary(&mut result, count, cutoff);
        result
    }
}

fn push_repeat_summary(result: &mut Vec<String>, count: usize, cutoff: usize) {
    if count > cutoff {
        let remaining = count - cutoff;
        let plural = if remaining > 1 { "s" } else { "" };
        result.push(format!(
            "  [Previous line repeated {remaining} more time{plural}]\n"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(count: u32) -> Vec<RawFrame> {
        (1..=count)
            .map(|n| RawFrame::new("main.rs", n, "main"))
            .collect()
    }

    #[test]
    fn limit_selects_outermost_or_innermost() {
        let all = frames(5);
        assert_eq!(select_frames(&all, None).len(), 5);
        assert_eq!(select_frames(&all, Some(2))[1].lineno, 2);
        assert_eq!(select_frames(&all, Some(0)).len(), 0);
        assert_eq!(select_frames(&all, Some(9)).len(), 5);

        let innermost = select_frames(&all, Some(-2));
        assert_eq!(innermost.len(), 2);
        assert_eq!(innermost[0].lineno, 4);
        assert_eq!(select_frames(&all, Some(-9)).len(), 5);
    }

    #[test]
    fn repeat_summary_pluralizes() {
        let mut lines = Vec::new();
        push_repeat_summary(&mut lines, 3, 3);
        assert!(lines.is_empty());
        push_repeat_summary(&mut lines, 4, 3);
        push_repeat_summary(&mut lines, 5, 3);
        assert_eq!(
            lines,
            [
                "  [Previous line repeated 1 more time]\n",
                "  [Previous line repeated 2 more times]\n",
            ]
        );
    }
}
