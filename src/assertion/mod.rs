//! @ai:module:intent Pure assertion evaluation over generated output
//! @ai:module:layer domain
//! @ai:module:public_api evaluate, AssertionResult, line_count

pub mod evaluator;
pub mod json_path;

pub use evaluator::{evaluate, line_count, AssertionResult};
