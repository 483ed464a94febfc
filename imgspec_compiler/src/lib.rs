// Internal modules
pub mod batch;
pub mod compiler;
pub mod config;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod spec;
pub mod syntax;
pub mod utils;

// Re-export key types for library consumers
pub use batch::{compile_batch, BatchConfig, BatchError, BatchResults, ClauseInput};
pub use compiler::{
    compile_clause, compile_parameters, parse_image_filter, parse_integer_parameter, parse_rect,
    CompileError, CompileResult,
};
pub use config::CompilerDefaults;
pub use spec::{ErrorRate, ErrorRateUnit, FilterChain, FilterOp, ImageCheckSpec, Rect};
pub use syntax::{split_parameters, Parameter};
