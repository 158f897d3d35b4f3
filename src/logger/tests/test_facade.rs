use crate::logger::{self, LogLevel, Logger, init_logger, log};
use std::sync::{Arc, Mutex};

struct CapturingLogger {
    records: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl Logger for CapturingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.records
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

// Other tests log through the facade concurrently, so only look for our own records.
#[test]
fn facade_routes_to_installed_logger() {
    let records = Arc::new(Mutex::new(Vec::new()));
    init_logger(CapturingLogger {
        records: records.clone(),
    });

    log(LogLevel::Info, "facade-test: hello");
    logger::warn("facade-test: careful");
    logger::flush();

    let guard = records.lock().unwrap();
    let ours: Vec<_> = guard
        .iter()
        .filter(|(_, msg)| msg.starts_with("facade-test:"))
        .collect();
    assert_eq!(ours.len(), 2);
    assert_eq!(ours[0].0, LogLevel::Info);
    assert_eq!(ours[0].1, "facade-test: hello");
    assert_eq!(ours[1].0, LogLevel::Warn);
}
