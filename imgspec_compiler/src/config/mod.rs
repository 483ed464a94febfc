//! Configuration module for the image spec compiler
//!
//! Compile-time limits live in [`constants`]; user preferences and the
//! defaults seeded into every compiled spec live in [`runtime`].

pub mod constants;
pub mod runtime;

pub use constants::compile_time;
pub use runtime::{CompilerDefaults, ConfigError, LogLevel, LoggingPreferences};
