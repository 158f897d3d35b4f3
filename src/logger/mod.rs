//! Top-level logger exports and a small global facade.
//!
//! - `Logger`: trait defining the logging surface
//! - `LogLevel`: enum of levels
//! - `NoopLogger`: drops everything
//! - `StdoutLogger`: JSON lines on stdout, gated by a minimum level
//!
//! ```rust,no_run
//! use collab_graph::logger::{self, LogLevel, StdoutLogger};
//! logger::init_logger(StdoutLogger::new(LogLevel::Info));
//! logger::info("collection started");
//! ```

pub mod core;

pub use self::core::{LogLevel, Logger, NoopLogger, StdoutLogger};

use std::sync::{Arc, RwLock};

/// Process-wide logger used by the convenience helpers below.
/// Unset means every helper is a no-op.
static GLOBAL_LOGGER: RwLock<Option<Arc<dyn Logger>>> = RwLock::new(None);

/// Install the global logger, replacing any previous one.
pub fn init_logger<L: Logger>(logger: L) {
    let mut slot = match GLOBAL_LOGGER.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    *slot = Some(Arc::new(logger));
}

/// Log through the global logger if one is installed.
pub fn log(level: LogLevel, message: &str) {
    let logger = match GLOBAL_LOGGER.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    };
    if let Some(logger) = logger {
        logger.log(level, message);
    }
}

/// Flush the global logger, if any.
pub fn flush() {
    if let Ok(guard) = GLOBAL_LOGGER.read() {
        if let Some(logger) = guard.as_ref() {
            logger.flush();
        }
    }
}

pub fn trace(msg: &str) {
    log(LogLevel::Trace, msg);
}

pub fn debug(msg: &str) {
    log(LogLevel::Debug, msg);
}

pub fn info(msg: &str) {
    log(LogLevel::Info, msg);
}

pub fn warn(msg: &str) {
    log(LogLevel::Warn, msg);
}

pub fn error(msg: &str) {
    log(LogLevel::Error, msg);
}

#[cfg(test)]
mod tests;
