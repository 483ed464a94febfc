//! Clause-level syntax: turning clause text into ordered key/value parameters.

mod error;
mod splitter;

pub use error::{SplitError, SplitResult};
pub use splitter::{split_parameters, Parameter};
