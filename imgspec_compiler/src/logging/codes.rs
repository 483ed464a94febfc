//! Consolidated error codes and classification system
//!
//! Single source of truth for all error codes and their metadata. Every
//! error type in the crate maps onto one of these through `error_code()`.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// Lexical errors inside clause values
pub mod lexical {
    use super::Code;

    pub const INVALID_NUMBER: Code = Code::new("E020");
    pub const UNEXPECTED_END_OF_INPUT: Code = Code::new("E021");
    pub const TOKEN_TOO_LONG: Code = Code::new("E022");
    pub const TRAILING_CONTENT: Code = Code::new("E023");
}

/// Clause splitting error codes
pub mod syntax {
    use super::Code;

    pub const CLAUSE_TOO_LONG: Code = Code::new("E040");
    pub const EMPTY_KEY: Code = Code::new("E041");
    pub const UNTERMINATED_QUOTE: Code = Code::new("E042");
    pub const UNEXPECTED_AFTER_QUOTE: Code = Code::new("E043");
}

/// Clause compilation error codes
pub mod clause {
    use super::Code;

    pub const UNKNOWN_PARAMETER: Code = Code::new("E060");
    pub const UNKNOWN_FILTER: Code = Code::new("E061");
    pub const INVALID_INTEGER: Code = Code::new("E062");
    pub const NO_IMAGES_DEFINED: Code = Code::new("E063");
    pub const INVALID_ERROR_RATE: Code = Code::new("E064");
    pub const LIMIT_EXCEEDED: Code = Code::new("E065");
}

/// Batch compilation error codes
pub mod batch {
    use super::Code;

    pub const BATCH_TOO_LARGE: Code = Code::new("E090");
    pub const WORKER_FAILURE: Code = Code::new("E091");
    pub const INPUT_READ_FAILURE: Code = Code::new("E092");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const CLAUSE_COMPILED: Code = Code::new("I100");
    pub const BATCH_COMPLETE: Code = Code::new("I110");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // Lexical errors
            ErrorMetadata::new(
                "E020",
                "Lexical",
                Severity::Medium,
                "Value is not a plain decimal number",
                "Write numbers as digits with an optional sign and fraction",
            ),
            ErrorMetadata::new(
                "E021",
                "Lexical",
                Severity::Medium,
                "Value ended before all expected tokens were read",
                "Supply every token the parameter requires",
            ),
            ErrorMetadata::new(
                "E022",
                "Lexical",
                Severity::Medium,
                "Token exceeds maximum length",
                "Shorten the token",
            ),
            ErrorMetadata::new(
                "E023",
                "Lexical",
                Severity::Medium,
                "Unexpected text after the expected tokens",
                "Remove the extra tokens from the value",
            ),
            // Syntax errors
            ErrorMetadata::new(
                "E040",
                "Syntax",
                Severity::High,
                "Clause exceeds maximum length",
                "Split the check into several clauses",
            ),
            ErrorMetadata::new(
                "E041",
                "Syntax",
                Severity::Medium,
                "Parameter has a value but no name",
                "Write parameters as 'name: value'",
            ),
            ErrorMetadata::new(
                "E042",
                "Syntax",
                Severity::Medium,
                "Quoted value is never closed",
                "Add the closing double quote",
            ),
            ErrorMetadata::new(
                "E043",
                "Syntax",
                Severity::Medium,
                "Text follows a quoted value",
                "Put the whole value inside the quotes",
            ),
            // Clause errors
            ErrorMetadata::new(
                "E060",
                "Clause",
                Severity::Medium,
                "Unknown image check parameter",
                "Use one of: file, error, tolerance, analyze-offset, stretch, area, filter, filter-a, filter-b, map-filter, crop-if-outside",
            ),
            ErrorMetadata::new(
                "E061",
                "Clause",
                Severity::Medium,
                "Unknown image filter",
                "Use one of: contrast, blur, denoise, saturation, quantinize",
            ),
            ErrorMetadata::new(
                "E062",
                "Clause",
                Severity::Medium,
                "Parameter must be a non-negative integer",
                "Write the value as plain digits",
            ),
            ErrorMetadata::new(
                "E063",
                "Clause",
                Severity::Medium,
                "Image check has no baseline images",
                "Add at least one 'file' parameter",
            ),
            ErrorMetadata::new(
                "E064",
                "Clause",
                Severity::Medium,
                "Invalid error rate",
                "Write the error rate as '<number>%' or '<number>px'",
            ),
            ErrorMetadata::new(
                "E065",
                "Clause",
                Severity::High,
                "Clause exceeds a compilation limit",
                "Reduce the number of parameters or filters",
            ),
            // Batch errors
            ErrorMetadata::new(
                "E090",
                "Batch",
                Severity::High,
                "Batch exceeds maximum clause count",
                "Split the input into smaller batches",
            ),
            ErrorMetadata::new(
                "E091",
                "Batch",
                Severity::Critical,
                "Batch worker thread panicked",
                "File a bug report with the batch input",
            ),
            ErrorMetadata::new(
                "E092",
                "Batch",
                Severity::High,
                "Clause file could not be read",
                "Check the clause file path and permissions",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Low)
}

/// Check if error is recoverable. Only critical errors abort a batch.
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity != Severity::Critical)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    !is_recoverable(code)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_code_has_metadata() {
        let error_codes = [
            lexical::INVALID_NUMBER,
            lexical::UNEXPECTED_END_OF_INPUT,
            lexical::TOKEN_TOO_LONG,
            lexical::TRAILING_CONTENT,
            syntax::CLAUSE_TOO_LONG,
            syntax::EMPTY_KEY,
            syntax::UNTERMINATED_QUOTE,
            syntax::UNEXPECTED_AFTER_QUOTE,
            clause::UNKNOWN_PARAMETER,
            clause::UNKNOWN_FILTER,
            clause::INVALID_INTEGER,
            clause::NO_IMAGES_DEFINED,
            clause::INVALID_ERROR_RATE,
            clause::LIMIT_EXCEEDED,
            batch::BATCH_TOO_LARGE,
            batch::WORKER_FAILURE,
            batch::INPUT_READ_FAILURE,
        ];

        for code in error_codes {
            let metadata = get_error_metadata(code.as_str());
            assert!(metadata.is_some(), "missing metadata for {}", code);
            assert_eq!(metadata.unwrap().code, code.as_str());
        }
    }

    #[test]
    fn test_classification_lookups() {
        assert_eq!(get_category("E061"), "Clause");
        assert_eq!(get_severity("E091"), Severity::Critical);
        assert_eq!(get_severity("E065"), Severity::High);
        assert_eq!(get_description("nope"), "Unknown error");
        assert_eq!(get_action("nope"), "No specific action available");
        assert_eq!(get_category("I100"), "Unknown");
    }

    #[test]
    fn test_only_critical_errors_halt() {
        assert!(requires_halt(batch::WORKER_FAILURE.as_str()));
        assert!(is_recoverable(clause::UNKNOWN_FILTER.as_str()));
        assert!(!requires_halt(clause::NO_IMAGES_DEFINED.as_str()));
        assert!(is_recoverable("Z999"));
    }
}
