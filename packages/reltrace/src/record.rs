//! Traceback records: the formatted view of an exception graph

use crate::config::FormatOptions;
use crate::exception::{Exception, ExceptionKind, SyntaxDetails};
use crate::path::PathStyle;
use crate::source::LineSource;
use crate::stack::{StackCapture, StackSummary};
use reltrace_common::LoggingTransformer;
use std::collections::HashSet;
use std::iter;

const TRACEBACK_HEADER: &str = "Traceback (most recent call last):\n";

static CAUSE_MESSAGE: [&str; 3] = [
    "\n",
    "The above exception was the direct cause of the following exception:\n",
    "\n",
];

static CONTEXT_MESSAGE: [&str; 3] = [
    "\n",
    "During handling of the above exception, another exception occurred:\n",
    "\n",
];

/// One exception prepared for rendering, with its chained records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracebackRecord {
    type_name: String,
    message: String,
    kind: ExceptionKind,
    stack: StackSummary,
    cause: Option<Box<TracebackRecord>>,
    context: Option<Box<TracebackRecord>>,
    suppress_context: bool,
}

impl TracebackRecord {
    /// Build the record tree for `exception`.
    ///
    /// Every exception appears at most once in the tree; links back to one
    /// already visited are dropped. Source lines are loaded for the whole
    /// tree when `options.lookup_lines` is set.
    pub fn new(
        exception: &Exception,
        options: &FormatOptions,
        capture: &dyn StackCapture,
        lines: &dyn LineSource,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut record = Self::build(exception, options, capture, &mut seen);
        if options.lookup_lines {
            record.load_lines(lines);
        }
        LoggingTransformer::log_record_built(
            &record.type_name,
            record.stack.len(),
            seen.len() - 1,
        );
        record
    }

    fn build(
        exception: &Exception,
        options: &FormatOptions,
        capture: &dyn StackCapture,
        seen: &mut HashSet<usize>,
    ) -> Self {
        seen.insert(exception.id());
        let cause = Self::chained("cause", exception.cause(), options, capture, seen);
        let context = Self::chained("context", exception.context(), options, capture, seen);
        let stack = exception
            .traceback()
            .map(|traceback| capture.extract(traceback, options.limit, options.capture_locals))
            .unwrap_or_default();

        Self {
            type_name: exception.type_name().to_owned(),
            message: exception.message().to_owned(),
            kind: exception.kind().clone(),
            stack,
            cause,
            context,
            suppress_context: exception.suppress_context(),
        }
    }

    fn chained(
        link: &str,
        exception: Option<&Exception>,
        options: &FormatOptions,
        capture: &dyn StackCapture,
        seen: &mut HashSet<usize>,
    ) -> Option<Box<Self>> {
        let exception = exception?;
        if seen.contains(&exception.id()) {
            LoggingTransformer::log_cycle_skipped(link, exception.type_name());
            return None;
        }
        Some(Box::new(Self::build(exception, options, capture, seen)))
    }

    fn load_lines(&mut self, lines: &dyn LineSource) {
        self.stack.load_lines(lines);
        if let Some(cause) = &mut self.cause {
            cause.load_lines(lines);
        }
        if let Some(context) = &mut self.context {
            context.load_lines(lines);
        }
    }

    /// Type name shown on the final line
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// This record's own frames
    #[must_use]
    pub fn stack(&self) -> &StackSummary {
        &self.stack
    }

    /// The cause record, absent when unlinked or already visited
    #[must_use]
    pub fn cause(&self) -> Option<&TracebackRecord> {
        self.cause.as_deref()
    }

    /// The context record, absent when unlinked or already visited
    #[must_use]
    pub fn context(&self) -> Option<&TracebackRecord> {
        self.context.as_deref()
    }

    /// Lazily render the record as newline-terminated lines.
    ///
    /// With `chain`, the context block (unless suppressed) and then the cause
    /// block come first, each followed by its connector text. The record's
    /// own stack and final exception line close the output.
    pub fn format<'a>(
        &'a self,
        paths: &'a dyn PathStyle,
        cutoff: usize,
        chain: bool,
    ) -> Box<dyn Iterator<Item = String> + 'a> {
        let context = self
            .context
            .as_deref()
            .filter(|_| chain && !self.suppress_context)
            .into_iter()
            .flat_map(move |context| {
                context
                    .format(paths, cutoff, chain)
                    .chain(CONTEXT_MESSAGE.iter().map(|line| (*line).to_owned()))
            });
        let cause = self
            .cause
            .as_deref()
            .filter(|_| chain)
            .into_iter()
            .flat_map(move |cause| {
                cause
                    .format(paths, cutoff, chain)
                    .chain(CAUSE_MESSAGE.iter().map(|line| (*line).to_owned()))
            });
        let stack = Some(&self.stack)
            .filter(|stack| !stack.is_empty())
            .into_iter()
            .flat_map(move |stack| {
                iter::once(TRACEBACK_HEADER.to_owned()).chain(stack.format(paths, cutoff))
            });
        let last = iter::once_with(move || self.format_exception_only()).flatten();

        Box::new(context.chain(cause).chain(stack).chain(last))
    }

    /// The final line(s): `Type: message`, or the parse-error block
    #[must_use]
    pub fn format_exception_only(&self) -> Vec<String> {
        match &self.kind {
            ExceptionKind::Generic => vec![final_line(&self.type_name, &self.message)],
            ExceptionKind::Syntax(details) => syntax_block(&self.type_name, details),
        }
    }
}

fn final_line(type_name: &str, message: &str) -> String {
    if message.is_empty() {
        format!("{type_name}\n")
    } else {
        format!("{type_name}: {message}\n")
    }
}

fn syntax_block(type_name: &str, details: &SyntaxDetails) -> Vec<String> {
    let filename = details
        .filename
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or("<string>");
    let lineno = details
        .lineno
        .map_or_else(|| "?".to_owned(), |lineno| lineno.to_string());
    let mut lines = vec![format!("  File \"{filename}\", line {lineno}\n")];

    if let Some(text) = &details.text {
        let rtext = text.trim_end_matches('\n');
        let ltext = rtext.trim_start_matches([' ', '\n', '\x0c']);
        let spaces = rtext.chars().count() - ltext.chars().count();
        lines.push(format!("    {ltext}\n"));
        if let Some(caret) = details.offset.unwrap_or(0).checked_sub(1 + spaces) {
            let caretspace: String = ltext
                .chars()
                .take(caret)
                .map(|c| if c.is_whitespace() { c } else { ' ' })
                .collect();
            lines.push(format!("    {caretspace}^\n"));
        }
    }

    let msg = details
        .msg
        .as_deref()
        .filter(|msg| !msg.is_empty())
        .unwrap_or("<no detail available>");
    lines.push(format!("{type_name}: {msg}\n"));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_prints_type_alone() {
        assert_eq!(final_line("KeyboardInterrupt", ""), "KeyboardInterrupt\n");
        assert_eq!(final_line("ValueError", "bad"), "ValueError: bad\n");
    }

    #[test]
    fn caret_skips_stripped_indentation() {
        let details = SyntaxDetails {
            filename: Some("./cfg.toml".to_owned()),
            lineno: Some(4),
            text: Some("    key = = 1\n".to_owned()),
            offset: Some(11),
            msg: Some("unexpected '='".to_owned()),
        };
        assert_eq!(
            syntax_block("SyntaxError", &details),
            [
                "  File \"./cfg.toml\", line 4\n",
                "    key = = 1\n",
                "          ^\n",
                "SyntaxError: unexpected '='\n",
            ]
        );
    }

    #[test]
    fn unknown_syntax_fields_use_placeholders() {
        let block = syntax_block("SyntaxError", &SyntaxDetails::default());
        assert_eq!(
            block,
            [
                "  File \"<string>\", line ?\n",
                "SyntaxError: <no detail available>\n",
            ]
        );
    }
}
