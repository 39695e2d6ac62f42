//! Tests for `Report` and conversion of standard and workspace errors

use reltrace::{Error, ErrorKind, Exception, Report, RelativeToCwd};
use reltrace_common::err;
use std::fmt;
use std::io;

#[derive(Debug)]
struct ConfigError {
    source: io::Error,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cannot load settings")
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

fn read_settings() -> Result<String, ConfigError> {
    Err(ConfigError {
        source: io::Error::new(io::ErrorKind::NotFound, "settings.toml"),
    })
}

fn load_settings() -> Result<(), Report> {
    read_settings()?;
    Ok(())
}

fn write_output() -> reltrace::Result<()> {
    Err(Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "stderr closed")))
}

fn flush_output() -> Result<(), Report> {
    write_output()?;
    Ok(())
}

#[test]
fn test_source_chain_becomes_cause_chain() {
    let error = ConfigError {
        source: io::Error::new(io::ErrorKind::NotFound, "settings.toml"),
    };

    let exception = Exception::from_error(&error);

    assert!(exception.type_name().ends_with("ConfigError"));
    assert_eq!(exception.message(), "cannot load settings");
    assert!(exception.suppress_context());
    let cause = exception.cause().expect("io error becomes the cause");
    assert_eq!(cause.message(), "settings.toml");
    assert!(cause.traceback().is_none());
}

#[test]
fn test_report_debug_renders_traceback() {
    let report = load_settings().expect_err("load fails");

    let rendered = format!("{report:?}");

    assert!(rendered.starts_with("Error: settings.toml\n"));
    assert!(rendered.contains(
        "\nThe above exception was the direct cause of the following exception:\n\n"
    ));
    assert!(rendered.ends_with("ConfigError: cannot load settings\n"));
    assert!(report.to_string().ends_with("ConfigError: cannot load settings"));
}

#[test]
fn test_report_wraps_exception_unchanged() {
    let exception = Exception::builder("ValueError", "bad")
        .no_implicit_context()
        .build();

    let report = Report::from(exception.clone());

    assert!(report.exception().ptr_eq(&exception));
    assert_eq!(report.to_string(), "ValueError: bad");
}

#[test]
fn test_workspace_error_keeps_kind_context_and_backtrace() {
    let error: Error = err!(configuration, "recursive_cutoff must be at least 1");
    assert!(matches!(error.kind(), ErrorKind::Configuration));

    let exception = Exception::from_common_error(&error);

    assert_eq!(exception.type_name(), "reltrace_common::Error");
    assert!(exception
        .message()
        .starts_with("Configuration error: recursive_cutoff must be at least 1 at "));
    assert!(exception.traceback().is_some());
}

#[test]
fn test_workspace_error_source_is_rendered_as_cause() {
    let error = Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "stderr closed"));
    let exception = Exception::from_common_error(&error);

    let formatter = reltrace::Formatter::default().with_path_style(RelativeToCwd::new());
    let lines = formatter.format_exception(&exception);

    assert!(lines.contains(&"Error: stderr closed\n".to_owned()));
    assert_eq!(lines.last().map(String::as_str), Some("reltrace_common::Error: I/O error\n"));
}

#[test]
fn test_workspace_error_through_question_mark_renders_source_once() {
    let report = flush_output().expect_err("write fails");

    assert_eq!(report.exception().type_name(), "reltrace_common::Error");
    assert_eq!(report.exception().message(), "I/O error");
    let rendered = format!("{report:?}");
    assert_eq!(rendered.matches("Error: stderr closed").count(), 1);
    assert!(!rendered.contains("Caused by"));
    assert!(rendered.starts_with("Error: stderr closed\n"));
    assert!(rendered.ends_with("\nreltrace_common::Error: I/O error\n"));
}
