//! Logging primitives for the collection pipeline.
//!
//! A single required `log` method keeps test loggers tiny; the level helpers
//! are implemented in terms of it. `StdoutLogger` writes one JSON object per
//! line so long crawls can be piped into structured log collectors.
//!
//! Implementors of `Logger` must be `Send + Sync + 'static` so they can be
//! installed behind the process-wide facade.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Short upper-case name used in log records.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Case-insensitive parse of a level name (`"warn"`, `"WARNING"`, ...).
    pub fn parse(name: &str) -> Option<LogLevel> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

pub trait Logger: Send + Sync + 'static {
    /// Emit a log record at the given level.
    fn log(&self, level: LogLevel, message: &str);

    /// Flush any buffered records.
    fn flush(&self) {}

    fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }
    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }
    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }
    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }
    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Drops every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: LogLevel, _message: &str) {}
}

/// JSON-lines logger writing to stdout.
///
/// Records below `min_level` are discarded.
/// Example: `{"ts":"2024-05-01T10:00:00+00:00","level":"INFO","msg":"..."}`
#[derive(Debug, Clone, Copy)]
pub struct StdoutLogger {
    min_level: LogLevel,
}

impl StdoutLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Renders a record as a single JSON line (without the trailing newline).
    pub fn format_record(level: LogLevel, message: &str) -> String {
        let ts = chrono::Utc::now().to_rfc3339();
        serde_json::json!({
            "ts": ts,
            "level": level.as_str(),
            "msg": message,
        })
        .to_string()
    }
}

impl Default for StdoutLogger {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl Logger for StdoutLogger {
    fn log(&self, level: LogLevel, message: &str) {
        if self.enabled(level) {
            println!("{}", Self::format_record(level, message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loglevel_as_str_success() {
        assert_eq!(LogLevel::Trace.as_str(), "TRACE");
        assert_eq!(LogLevel::Debug.as_str(), "DEBUG");
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Warn.as_str(), "WARN");
        assert_eq!(LogLevel::Error.as_str(), "ERROR");
    }

    #[test]
    fn test_loglevel_ordering_is_monotonic() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_loglevel_parse() {
        assert_eq!(LogLevel::parse("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse(" WARNING "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("Error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("verbose"), None);
    }

    #[test]
    fn test_nooplogger_accepts_all_levels() {
        let logger = NoopLogger;
        logger.trace("trace");
        logger.debug("debug");
        logger.info("info");
        logger.warn("warn");
        logger.error("error");
        logger.flush();
    }

    #[test]
    fn test_stdoutlogger_level_gate() {
        let logger = StdoutLogger::new(LogLevel::Warn);
        assert!(!logger.enabled(LogLevel::Info));
        assert!(logger.enabled(LogLevel::Warn));
        assert!(logger.enabled(LogLevel::Error));
        assert_eq!(StdoutLogger::default().min_level(), LogLevel::Info);
    }
}
