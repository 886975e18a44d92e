//! CLI command implementations.

pub mod analyze;
pub mod popular;
pub mod validate;
