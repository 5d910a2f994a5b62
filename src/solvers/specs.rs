use crate::{adf::Interpretation, error::Result};

/// A trait for objects checking whether a candidate interpretation belongs to a semantics.
///
/// Verifiers are used to filter the candidates produced by a [`CandidateGenerator`](super::CandidateGenerator)
/// and to guide the [`Maximizer`](super::Maximizer).
/// They must not alter the sessions of the components they are used with.
pub trait Verifier {
    /// Returns `true` iff the candidate is accepted.
    fn verify(&mut self, candidate: &Interpretation) -> Result<bool>;
}
