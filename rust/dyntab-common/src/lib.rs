//! Core definitions (error taxonomy and `Result`), relied upon by all
//! dyntab-* crates.

pub mod error;
pub mod result;

pub use result::Result;
