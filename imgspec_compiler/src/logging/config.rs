//! Logging configuration: compile-time message limits plus runtime preferences
//!
//! Preferences can be installed once per process; until then they fall back to
//! the `IMGSPEC_LOGGING_*` environment variables.

use crate::config::compile_time::logging::MAX_LOG_MESSAGE_LENGTH;
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences. Fails if preferences were already installed.
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

pub fn get_min_log_level() -> EventsLogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

/// Clamp a message to the compile-time maximum, on a char boundary
pub fn clamp_message(message: &str) -> &str {
    if message.len() <= MAX_LOG_MESSAGE_LENGTH {
        return message;
    }
    let mut end = MAX_LOG_MESSAGE_LENGTH;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}

/// Validate compile-time constants
pub fn validate_config() -> Result<(), String> {
    if !(256..=1_048_576).contains(&MAX_LOG_MESSAGE_LENGTH) {
        return Err(format!(
            "Max log message length out of range: {}",
            MAX_LOG_MESSAGE_LENGTH
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(validate_config().is_ok());
    }

    #[test]
    fn test_clamp_message() {
        assert_eq!(clamp_message("short"), "short");

        let long = "é".repeat(MAX_LOG_MESSAGE_LENGTH);
        let clamped = clamp_message(&long);
        assert!(clamped.len() <= MAX_LOG_MESSAGE_LENGTH);
        assert!(clamped.chars().all(|c| c == 'é'));
    }
}
