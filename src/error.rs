//! Error types shared by the whole library.

use thiserror::Error;

/// The errors raised while compiling a formula into clauses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// The formula refers to an argument for which no atom is available.
    #[error("no atom bound to argument with id {0}")]
    UnboundArgument(usize),
    /// The formula refers to a label that does not match any argument.
    #[error("unknown argument {0}")]
    UnknownArgument(String),
    /// A connective was used with a number of operands it does not support.
    #[error("connective {connective} cannot be applied to {arity} operand(s)")]
    UnsupportedArity {
        /// the name of the connective
        connective: &'static str,
        /// the number of operands found
        arity: usize,
    },
}

/// The errors raised by the reasoning components.
#[derive(Debug, Error)]
pub enum Error {
    /// The SAT oracle could not be created or invoked.
    #[error("SAT oracle unavailable: {0}")]
    OracleUnavailable(String),
    /// The SAT oracle was queried in a way its protocol does not allow.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    /// An acceptance condition could not be compiled.
    #[error("malformed acceptance condition for argument {argument}")]
    MalformedAcceptanceCondition {
        /// the label of the argument owning the acceptance condition
        argument: String,
        /// the underlying cause
        #[source]
        source: FormulaError,
    },
    /// A label does not match any argument.
    #[error("no such argument: {0}")]
    NoSuchArgument(String),
}

/// A specialized result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
