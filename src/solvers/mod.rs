//! Solvers computing the interpretations of Abstract Dialectical Frameworks.

mod candidate_generator;
pub use candidate_generator::CandidateGenerator;
pub use candidate_generator::CandidateKind;

mod grounded_fixpoint;
pub use grounded_fixpoint::FixpointOutcome;
pub use grounded_fixpoint::GroundedFixpoint;

mod link_classifier;
pub use link_classifier::BranchingPolicy;
pub use link_classifier::LinkTypeClassifier;
pub use link_classifier::RelativeBipolarity;
pub use link_classifier::RelativeKBipolarClassifier;

mod maximizer;
pub use maximizer::Maximizer;

mod reasoner;
pub use reasoner::AdfReasoner;
pub use reasoner::InterpretationIterator;
pub use reasoner::ReasonerConfig;
pub use reasoner::Semantics;

mod specs;
pub use specs::Verifier;

mod verifiers;
pub use verifiers::AdmissibleVerifier;
pub use verifiers::CompleteVerifier;
pub use verifiers::StableVerifier;
