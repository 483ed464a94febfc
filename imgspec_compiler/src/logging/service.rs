//! Logging service and logger backends

use super::config;
use super::events::{LogEvent, LogLevel};
use std::sync::Arc;

/// Simple logger trait
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Main logging service with configuration awareness
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    /// Create new logging service with specified logger and minimum level
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Create service from the runtime logging preferences.
    ///
    /// With console output disabled, events are discarded.
    pub fn with_config() -> Self {
        let min_level = config::get_min_log_level();
        let logger: Arc<dyn Logger> = if !config::use_console_logging() {
            Arc::new(NullLogger)
        } else if config::use_structured_logging() {
            Arc::new(StructuredLogger::new(min_level))
        } else {
            Arc::new(ConsoleLogger::new(min_level))
        };

        Self::new(logger, min_level)
    }

    /// Check if level should be logged
    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    /// Log an event
    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

/// Human-readable logger. All output goes to stderr so stdout stays
/// reserved for compiled specs.
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            eprintln!("{}", event.format());
        }
    }
}

/// One JSON object per line on stderr
pub struct StructuredLogger {
    min_level: LogLevel,
}

impl StructuredLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            // Fall back to plain text if JSON serialization fails
            let line = event.format_json().unwrap_or_else(|_| event.format());
            eprintln!("{}", line);
        }
    }
}

/// Discards every event
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _event: &LogEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CaptureLogger {
        events: Mutex<Vec<LogEvent>>,
    }

    impl CaptureLogger {
        fn codes(&self) -> Vec<&'static str> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.code.as_str())
                .collect()
        }
    }

    impl Logger for CaptureLogger {
        fn log(&self, event: &LogEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_console_structured_and_null_loggers() {
        let event = LogEvent::error(codes::clause::UNKNOWN_PARAMETER, "Unknown parameter 'size'")
            .with_context("clause", "1");

        // Should not panic
        ConsoleLogger::new(LogLevel::Info).log(&event);
        StructuredLogger::new(LogLevel::Debug).log(&event);
        NullLogger.log(&event);
    }

    #[test]
    fn test_logging_service_forwards_events() {
        let logger = Arc::new(CaptureLogger::default());
        let service = LoggingService::new(logger.clone(), LogLevel::Debug);

        service.log_event(LogEvent::error(codes::clause::NO_IMAGES_DEFINED, "Test error"));
        service.log_event(LogEvent::success(codes::success::CLAUSE_COMPILED, "Test success"));
        service.log_event(LogEvent::debug("Test debug"));

        assert_eq!(logger.codes(), vec!["E063", "I100", "D000"]);
    }

    #[test]
    fn test_log_level_filtering() {
        let logger = Arc::new(CaptureLogger::default());
        let service = LoggingService::new(logger.clone(), LogLevel::Error);

        service.log_event(LogEvent::debug("Debug message"));
        service.log_event(LogEvent::info("Info message"));
        service.log_event(LogEvent::error(codes::batch::WORKER_FAILURE, "Error message"));

        assert_eq!(logger.codes(), vec!["E091"]);
        assert!(service.should_log(LogLevel::Error));
        assert!(!service.should_log(LogLevel::Warning));
    }
}
