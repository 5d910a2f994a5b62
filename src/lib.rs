//! Crustadf is a RUST Abstract Dialectical Framework reasoner.

#![warn(missing_docs)]

pub mod adf;

pub mod encodings;

pub mod error;
pub use error::Error;
pub use error::FormulaError;
pub use error::Result;

pub mod sat;

pub mod solvers;
