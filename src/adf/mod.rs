//! This module contains the material used to define Abstract Dialectical Frameworks and their interpretations.

mod acceptance_condition;
pub use acceptance_condition::AcceptanceCondition;

mod adf_framework;
pub use adf_framework::AbstractDialecticalFramework;
pub use adf_framework::AdfBuilder;

mod arguments;
pub use arguments::Argument;
pub use arguments::ArgumentSet;
pub use arguments::LabelType;

mod interpretation;
pub use interpretation::Interpretation;
pub use interpretation::TruthValue;

mod link;
pub use link::Link;
pub use link::LinkType;
pub use link::LinkTypes;
