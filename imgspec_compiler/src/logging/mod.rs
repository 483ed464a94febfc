//! Global logging module for the image spec compiler
//!
//! Provides thread-safe global logging with a per-thread clause context, so
//! events raised while compiling one clause of a batch carry its label.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, NullLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

/// Identifies the clause being compiled on the current thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseContext {
    /// Human-readable origin, e.g. `checks.txt:12`
    pub label: String,
    /// Index within the current batch
    pub clause_id: usize,
}

thread_local! {
    static CLAUSE_CONTEXT: RefCell<Option<ClauseContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from the runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(LoggingService::with_config());
    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Whether a debug event would reach a logger
pub fn debug_enabled() -> bool {
    try_get_global_logger().is_some_and(|logger| logger.should_log(LogLevel::Debug))
}

// ============================================================================
// CLAUSE CONTEXT MANAGEMENT
// ============================================================================

pub fn set_clause_context(label: impl Into<String>, clause_id: usize) {
    let context = ClauseContext {
        label: label.into(),
        clause_id,
    };
    CLAUSE_CONTEXT.with(|ctx| *ctx.borrow_mut() = Some(context));
}

pub fn clear_clause_context() {
    CLAUSE_CONTEXT.with(|ctx| *ctx.borrow_mut() = None);
}

/// Run `f` with the clause context set on this thread
pub fn with_clause_context<F, R>(label: impl Into<String>, clause_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_clause_context(label, clause_id);
    let result = f();
    clear_clause_context();
    result
}

/// Get current clause context (used by macros)
pub fn get_current_clause_context() -> Option<ClauseContext> {
    CLAUSE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn attach_context(mut event: LogEvent, context: Vec<(&str, &str)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, config::clamp_message(value));
    }

    if let Some(clause_ctx) = get_current_clause_context() {
        event = event
            .with_context("clause", &clause_ctx.label)
            .with_context("clause_id", &clause_ctx.clause_id.to_string());
    }

    event
}

/// Log any event with context (used by log_info!, log_warning! and log_debug!)
pub fn log_event_with_context(event: LogEvent, context: Vec<(&str, &str)>) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(attach_context(event, context));
    }
}

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, config::clamp_message(message));
    if let Some(s) = span {
        event = event.with_span(s);
    }
    log_event_with_context(event, context);
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    log_event_with_context(LogEvent::success(code, message), context);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clause_context_management() {
        assert!(get_current_clause_context().is_none());

        set_clause_context("checks.txt:3", 2);
        let context = get_current_clause_context().unwrap();
        assert_eq!(context.label, "checks.txt:3");
        assert_eq!(context.clause_id, 2);

        clear_clause_context();
        assert!(get_current_clause_context().is_none());
    }

    #[test]
    fn test_with_clause_context() {
        let result = with_clause_context("inline", 0, || {
            assert_eq!(get_current_clause_context().unwrap().label, "inline");
            42
        });

        assert_eq!(result, 42);
        assert!(get_current_clause_context().is_none());
    }

    #[test]
    fn test_attach_context_adds_clause_label() {
        let event = with_clause_context("batch:7", 7, || {
            attach_context(LogEvent::info("hello"), vec![("paths", "2")])
        });

        assert_eq!(event.context.get("paths").map(String::as_str), Some("2"));
        assert_eq!(event.context.get("clause").map(String::as_str), Some("batch:7"));
        assert_eq!(event.context.get("clause_id").map(String::as_str), Some("7"));
    }
}
