//! Structured logging infrastructure
//!
//! Provides env_logger-based logging with proper integration with the
//! standard log crate. The formatter itself writes its rendering to the
//! caller's stream; these logs only describe what the formatter did.

use log::{debug, info, trace, warn};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Logging bootstrap and the formatter's log events
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging system (should be called once at application startup)
    ///
    /// Configure logging levels via `RUST_LOG` environment variable:
    /// - `RUST_LOG=debug` - Record building and handler installation
    /// - `RUST_LOG=trace` - Also report cut reference cycles
    /// - `RUST_LOG=reltrace=warn` - Only output failures from the panic hook
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();

            info!("Structured logging initialized");
        });
    }

    /// Initialize logging for test environments
    ///
    /// Use this in test modules to avoid initialization conflicts
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log that a chained exception was skipped because it was already visited
    pub fn log_cycle_skipped(link: &str, type_name: &str) {
        trace!("Skipping {link} link to already formatted {type_name}");
    }

    /// Log the shape of a freshly built record tree
    pub fn log_record_built(type_name: &str, frames: usize, chained: usize) {
        debug!("Built traceback record for {type_name} ({frames} frames, {chained} chained)");
    }

    /// Log installation of the process-wide handler
    pub fn log_handler_installed(handler: &str) {
        debug!("Installed {handler} as the uncaught error handler");
    }

    /// Log a failure to write a rendered traceback
    pub fn log_write_failure(target: &str, error: &dyn std::error::Error) {
        warn!("Failed to write traceback to {target}: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_operations() {
        LoggingTransformer::init_test();

        // These should not panic and should produce log output
        LoggingTransformer::log_cycle_skipped("context", "ValueError");
        LoggingTransformer::log_record_built("ValueError", 2, 1);
        LoggingTransformer::log_handler_installed("test handler");
        let io = std::io::Error::other("closed");
        LoggingTransformer::log_write_failure("stderr", &io);
    }
}
