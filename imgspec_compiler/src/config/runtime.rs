//! Runtime preferences: compiler defaults and logging, from the environment
//! or an `[image_spec]` TOML table

use crate::spec::ErrorRate;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Built-in error rate used when neither the environment nor a config file sets one
pub const BUILTIN_DEFAULT_ERROR_RATE: &str = "0%";

/// Built-in pixel tolerance used when neither the environment nor a config file sets one
pub const BUILTIN_DEFAULT_TOLERANCE: u32 = 25;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid default error rate '{value}': {reason}")]
    InvalidErrorRate { value: String, reason: String },
}

/// Values seeded into every compiled spec when the clause omits them.
///
/// Passed explicitly to the compiler; nothing reads it from global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerDefaults {
    pub error_rate: ErrorRate,
    pub tolerance: u32,
}

impl CompilerDefaults {
    pub fn new(error_rate: ErrorRate, tolerance: u32) -> Self {
        Self {
            error_rate,
            tolerance,
        }
    }

    /// Built-in defaults, ignoring the environment
    pub fn builtin() -> Self {
        Self {
            error_rate: ErrorRate::percent(0.0),
            tolerance: BUILTIN_DEFAULT_TOLERANCE,
        }
    }

    /// Built-in defaults overridden by `IMGSPEC_DEFAULT_*` environment variables.
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let builtin = Self::builtin();
        Self {
            error_rate: env::var(env_vars::DEFAULT_ERROR_RATE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(builtin.error_rate),
            tolerance: env::var(env_vars::DEFAULT_TOLERANCE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(builtin.tolerance),
        }
    }

    /// Parse an `[image_spec]` table; absent keys keep the built-in values
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        file.image_spec.unwrap_or_default().into_defaults()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

impl Default for CompilerDefaults {
    fn default() -> Self {
        Self::from_env()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    image_spec: Option<ImageSpecTable>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImageSpecTable {
    default_error_rate: Option<String>,
    default_tolerance: Option<u32>,
}

impl ImageSpecTable {
    fn into_defaults(self) -> Result<CompilerDefaults, ConfigError> {
        let builtin = CompilerDefaults::builtin();

        let error_rate = match self.default_error_rate {
            Some(text) => text
                .parse::<ErrorRate>()
                .map_err(|e| ConfigError::InvalidErrorRate {
                    value: text.clone(),
                    reason: e.to_string(),
                })?,
            None => builtin.error_rate,
        };

        Ok(CompilerDefaults {
            error_rate,
            tolerance: self.default_tolerance.unwrap_or(builtin.tolerance),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging (user preference)
    pub use_structured_logging: bool,

    /// Whether to enable console output (user preference)
    pub enable_console_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables and the CLI)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Compiler defaults
    pub const DEFAULT_ERROR_RATE: &str = "IMGSPEC_DEFAULT_ERROR_RATE";
    pub const DEFAULT_TOLERANCE: &str = "IMGSPEC_DEFAULT_TOLERANCE";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "IMGSPEC_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "IMGSPEC_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "IMGSPEC_LOGGING_MIN_LEVEL";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ErrorRateUnit;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("invalid"), None);
    }

    #[test]
    fn test_builtin_defaults() {
        let defaults = CompilerDefaults::builtin();
        assert_eq!(defaults.tolerance, BUILTIN_DEFAULT_TOLERANCE);
        assert_eq!(defaults.error_rate.to_string(), BUILTIN_DEFAULT_ERROR_RATE);
    }

    #[test]
    fn test_defaults_from_toml() {
        let defaults = CompilerDefaults::from_toml_str(
            r#"
            [image_spec]
            default_error_rate = "300px"
            default_tolerance = 7
            "#,
        )
        .unwrap();

        assert_eq!(defaults.tolerance, 7);
        assert_eq!(defaults.error_rate.unit, ErrorRateUnit::Pixels);
        assert_eq!(defaults.error_rate.value, 300.0);
    }

    #[test]
    fn test_defaults_from_toml_partial_table() {
        let defaults = CompilerDefaults::from_toml_str(
            r#"
            [image_spec]
            default_tolerance = 3
            "#,
        )
        .unwrap();
        assert_eq!(defaults.tolerance, 3);
        assert_eq!(defaults.error_rate, CompilerDefaults::builtin().error_rate);

        let empty = CompilerDefaults::from_toml_str("").unwrap();
        assert_eq!(empty, CompilerDefaults::builtin());
    }

    #[test]
    fn test_defaults_from_toml_rejects_bad_values() {
        let result = CompilerDefaults::from_toml_str(
            r#"
            [image_spec]
            default_error_rate = "lots"
            "#,
        );
        assert_matches!(result, Err(ConfigError::InvalidErrorRate { value, .. }) if value == "lots");

        let result = CompilerDefaults::from_toml_str(
            r#"
            [image_spec]
            default_tolerance = "five"
            "#,
        );
        assert_matches!(result, Err(ConfigError::Toml(_)));

        let result = CompilerDefaults::from_toml_str(
            r#"
            [image_spec]
            tolerence = 5
            "#,
        );
        assert_matches!(result, Err(ConfigError::Toml(_)));
    }

    #[test]
    fn test_defaults_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imgspec.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[image_spec]\ndefault_error_rate = \"1.5%\"").unwrap();

        let defaults = CompilerDefaults::load_from_file(&path).unwrap();
        assert_eq!(defaults.error_rate.value, 1.5);
        assert_eq!(defaults.error_rate.unit, ErrorRateUnit::Percent);

        let missing = CompilerDefaults::load_from_file(dir.path().join("missing.toml"));
        assert_matches!(missing, Err(ConfigError::Io { .. }));
    }

    #[test]
    fn test_env_var_names_exist() {
        assert!(!env_vars::DEFAULT_ERROR_RATE.is_empty());
        assert!(!env_vars::DEFAULT_TOLERANCE.is_empty());
        assert!(!env_vars::LOGGING_MIN_LEVEL.is_empty());
    }
}
