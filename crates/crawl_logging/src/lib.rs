#![deny(missing_docs)]
//! Shared logging utilities for the outlink workspace.
//!
//! This crate provides the `crawl_*` logging macros used across the codebase,
//! the single-line diagnostic format used for extraction faults, and a minimal
//! test initializer for the global logger.

/// Longest message prefix kept in a diagnostic line.
pub const MAX_DIAGNOSTIC_LEN: usize = 150;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! crawl_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! crawl_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! crawl_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! crawl_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! crawl_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Formats a failure message for operators as a single line naming the URL.
///
/// The message is cut to [`MAX_DIAGNOSTIC_LEN`] characters and line breaks are
/// removed, so one failing page never spans more than one log line.
pub fn single_line_diagnostic(message: &str, url: &str) -> String {
    let truncated: String = message
        .chars()
        .take(MAX_DIAGNOSTIC_LEN)
        .filter(|c| *c != '\n' && *c != '\r')
        .collect();
    format!("{truncated} >>> URL was: \"{url}\"")
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::{single_line_diagnostic, MAX_DIAGNOSTIC_LEN};

    #[test]
    fn diagnostic_names_the_url() {
        let line = single_line_diagnostic("connection reset", "http://example.com/a");
        assert_eq!(line, "connection reset >>> URL was: \"http://example.com/a\"");
    }

    #[test]
    fn diagnostic_is_a_single_line() {
        let line = single_line_diagnostic("first\nsecond\r\nthird", "http://example.com");
        assert!(!line.contains('\n'));
        assert!(!line.contains('\r'));
        assert!(line.starts_with("firstsecondthird"));
    }

    #[test]
    fn long_messages_are_truncated() {
        let message = "x".repeat(MAX_DIAGNOSTIC_LEN * 2);
        let line = single_line_diagnostic(&message, "http://example.com");
        let kept = line.split(" >>> ").next().unwrap_or_default();
        assert_eq!(kept.len(), MAX_DIAGNOSTIC_LEN);
    }
}
