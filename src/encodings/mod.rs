//! Objects used to encode Abstract Dialectical Frameworks into SAT solvers.

mod propositional_mapping;
pub use propositional_mapping::PropositionalMapping;

mod sat_encoding;
pub(crate) use sat_encoding::compile_acceptance_condition;
pub use sat_encoding::SatEncoding;

mod tseitin_transformer;
pub use tseitin_transformer::TseitinTransformer;

mod var_allocator;
pub use var_allocator::VarAllocator;
