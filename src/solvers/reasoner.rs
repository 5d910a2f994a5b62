use super::{
    AdmissibleVerifier, BranchingPolicy, CandidateGenerator, CandidateKind, CompleteVerifier,
    Maximizer, RelativeKBipolarClassifier, StableVerifier, Verifier,
};
use crate::{
    adf::{AbstractDialecticalFramework, Interpretation, LabelType, TruthValue},
    encodings::{PropositionalMapping, SatEncoding},
    error::{Error, Result},
    sat::{self, SatSolverFactoryFn},
};
use anyhow::anyhow;
use log::info;
use std::{fmt::Display, rc::Rc};

/// The semantics handled by the [`AdfReasoner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semantics {
    /// Conflict-free interpretations.
    ConflictFree,
    /// Naive interpretations, the maximal conflict-free ones.
    Naive,
    /// Admissible interpretations.
    Admissible,
    /// Preferred interpretations, the maximal admissible ones.
    Preferred,
    /// Complete interpretations.
    Complete,
    /// Two-valued models.
    Model,
    /// Stable models, the two-valued models whose accepted arguments are grounded in their reduct.
    Stable,
    /// The grounded interpretation.
    Ground,
}

impl Semantics {
    /// Returns the short name of the semantics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Semantics::ConflictFree => "cf",
            Semantics::Naive => "nai",
            Semantics::Admissible => "adm",
            Semantics::Preferred => "prf",
            Semantics::Complete => "com",
            Semantics::Model => "mod",
            Semantics::Stable => "stb",
            Semantics::Ground => "grd",
        }
    }

    fn candidate_kind(&self) -> CandidateKind {
        match self {
            Semantics::Model | Semantics::Stable => CandidateKind::TwoValuedModel,
            Semantics::Ground => CandidateKind::Grounded,
            _ => CandidateKind::ConflictFree,
        }
    }

    fn uses_bipolar_pruning(&self) -> bool {
        matches!(
            self,
            Semantics::Admissible | Semantics::Preferred | Semantics::Complete
        )
    }
}

impl TryFrom<&str> for Semantics {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "cf" => Ok(Semantics::ConflictFree),
            "nai" => Ok(Semantics::Naive),
            "adm" => Ok(Semantics::Admissible),
            "prf" => Ok(Semantics::Preferred),
            "com" => Ok(Semantics::Complete),
            "mod" => Ok(Semantics::Model),
            "stb" => Ok(Semantics::Stable),
            "grd" => Ok(Semantics::Ground),
            _ => Err(anyhow!("unknown semantics: {}", value)),
        }
    }
}

impl Display for Semantics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The parameters of the k-bipolar pruning made by an [`AdfReasoner`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReasonerConfig {
    /// The number of non-bipolar links under which the classifier stops branching.
    pub k: usize,
    /// The bound on the branching depth of the classifier.
    pub branching: BranchingPolicy,
}

/// Computes the interpretations of an ADF under a semantics.
///
/// A query combines a [`CandidateGenerator`], a [`Verifier`] and a [`Maximizer`], depending on the semantics:
///
/// | semantics | generator | verifier | maximizer |
/// |---|---|---|---|
/// | conflict-free | conflict-free | none | none |
/// | naive | conflict-free | none | yes |
/// | admissible | conflict-free | admissible | none |
/// | preferred | conflict-free | admissible | yes |
/// | complete | conflict-free | complete | none |
/// | model | two-valued | none | none |
/// | stable | two-valued | stable | none |
/// | ground | grounded | none | none |
///
/// For the admissible, preferred and complete semantics, the sessions are pruned
/// by relative k-bipolar encodings computed by a [`RelativeKBipolarClassifier`] configured with a [`ReasonerConfig`].
///
/// A reasoner can be restricted to the interpretations extending a prefix with [`restrict`](Self::restrict).
/// For the naive and preferred semantics, maximality is then taken among the interpretations extending the prefix.
/// For the ground semantics, the grounded interpretation is only returned if it extends the prefix.
///
/// # Example
///
/// ```
/// # use crustadf::adf::{AcceptanceCondition, AdfBuilder, ArgumentSet};
/// # use crustadf::solvers::{AdfReasoner, Semantics};
/// let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(&["a", "b"]));
/// builder.set_acceptance_condition(&"a", AcceptanceCondition::negation(AcceptanceCondition::argument("b"))).unwrap();
/// builder.set_acceptance_condition(&"b", AcceptanceCondition::negation(AcceptanceCondition::argument("a"))).unwrap();
/// let adf = builder.build();
/// let reasoner = AdfReasoner::new(&adf, Semantics::Preferred);
/// let preferred = reasoner.compute_all().unwrap();
/// assert_eq!(2, preferred.len());
/// assert!(preferred.iter().all(|i| i.is_total()));
/// ```
pub struct AdfReasoner<'a, T>
where
    T: LabelType,
{
    adf: &'a AbstractDialecticalFramework<T>,
    mapping: PropositionalMapping,
    semantics: Semantics,
    config: ReasonerConfig,
    prefix: Interpretation,
    solver_factory: Rc<SatSolverFactoryFn>,
}

impl<'a, T> AdfReasoner<'a, T>
where
    T: LabelType,
{
    /// Builds a new reasoner.
    ///
    /// The underlying SAT solvers are the ones returned by [default_solver](crate::sat::default_solver).
    pub fn new(adf: &'a AbstractDialecticalFramework<T>, semantics: Semantics) -> Self {
        Self::new_with_sat_solver_factory(adf, semantics, Box::new(|| sat::default_solver()))
    }

    /// Builds a new reasoner.
    ///
    /// The SAT solvers to use in given through the solver factory.
    pub fn new_with_sat_solver_factory(
        adf: &'a AbstractDialecticalFramework<T>,
        semantics: Semantics,
        solver_factory: Box<SatSolverFactoryFn>,
    ) -> Self {
        Self {
            adf,
            mapping: PropositionalMapping::new(adf),
            semantics,
            config: ReasonerConfig::default(),
            prefix: Interpretation::undecided(adf),
            solver_factory: Rc::from(solver_factory),
        }
    }

    /// Sets the configuration of the k-bipolar pruning.
    pub fn with_config(mut self, config: ReasonerConfig) -> Self {
        self.config = config;
        self
    }

    /// Restricts the computed interpretations to the ones extending the given prefix.
    ///
    /// Restrictions accumulate: the prefix is merged with the ones given by previous calls.
    /// A prefix deciding an argument which does not belong to the framework results in an [`Error::NoSuchArgument`] error,
    /// and a prefix contradicting a previous one results in an [`Error::InvalidQuery`] error.
    ///
    /// # Example
    ///
    /// ```
    /// # use crustadf::adf::{AcceptanceCondition, AdfBuilder, ArgumentSet, Interpretation, TruthValue};
    /// # use crustadf::solvers::{AdfReasoner, Semantics};
    /// let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(&["a", "b"]));
    /// builder.set_acceptance_condition(&"a", AcceptanceCondition::negation(AcceptanceCondition::argument("b"))).unwrap();
    /// builder.set_acceptance_condition(&"b", AcceptanceCondition::negation(AcceptanceCondition::argument("a"))).unwrap();
    /// let adf = builder.build();
    /// let prefix = Interpretation::from_labels(&adf, &[("a", TruthValue::True)]).unwrap();
    /// let reasoner = AdfReasoner::new(&adf, Semantics::Preferred).restrict(&prefix).unwrap();
    /// let preferred = reasoner.compute_all().unwrap();
    /// assert_eq!(1, preferred.len());
    /// assert_eq!(TruthValue::False, preferred[0].value_of_id(1));
    /// ```
    pub fn restrict(mut self, prefix: &Interpretation) -> Result<Self> {
        for (id, value) in prefix.decided() {
            if id >= self.adf.n_arguments() {
                return Err(Error::NoSuchArgument(format!(
                    "argument id {} in a framework of {} argument(s)",
                    id,
                    self.adf.n_arguments()
                )));
            }
            let current = self.prefix.value_of_id(id);
            if current.is_decided() && current != TruthValue::from(value) {
                return Err(Error::InvalidQuery(format!(
                    "argument {} is already restricted to {}",
                    self.adf.argument_set().get_argument_by_id(id),
                    current
                )));
            }
            self.prefix = self.prefix.with_value(id, TruthValue::from(value));
        }
        Ok(self)
    }

    /// Returns the semantics of this reasoner.
    pub fn semantics(&self) -> Semantics {
        self.semantics
    }

    fn share_factory(&self) -> Box<SatSolverFactoryFn> {
        let factory = Rc::clone(&self.solver_factory);
        Box::new(move || factory())
    }

    /// Returns an iterator over the interpretations of the semantics.
    ///
    /// Each call starts a new query, with its own solver sessions.
    /// An invalid [`BranchingPolicy`] results in an [`Error::InvalidQuery`] error, whatever the semantics.
    pub fn iter(&self) -> Result<InterpretationIterator<'_, T>> {
        self.config.branching.bound(self.adf.n_arguments())?;
        info!(
            "computing the {} interpretations of an ADF with {} arguments and {} links, {} of them fixed",
            self.semantics,
            self.adf.n_arguments(),
            self.adf.n_links(),
            self.prefix.n_decided()
        );
        let mut generator = CandidateGenerator::initialize(
            self.semantics.candidate_kind(),
            self.adf,
            &self.mapping,
            (self.solver_factory)(),
        )?;
        let verifier: Option<Box<dyn Verifier + '_>> = match self.semantics {
            Semantics::Admissible | Semantics::Preferred => {
                Some(Box::new(AdmissibleVerifier::new_with_sat_solver_factory(
                    self.adf,
                    &self.mapping,
                    self.share_factory(),
                )?))
            }
            Semantics::Complete => Some(Box::new(CompleteVerifier::new_with_sat_solver_factory(
                self.adf,
                &self.mapping,
                self.share_factory(),
            )?)),
            Semantics::Stable => Some(Box::new(StableVerifier::new_with_sat_solver_factory(
                self.adf,
                self.share_factory(),
            ))),
            _ => None,
        };
        let mut maximizer = match self.semantics {
            Semantics::Naive | Semantics::Preferred => Some(Maximizer::new_with_sat_solver_factory(
                self.adf,
                &self.mapping,
                self.share_factory(),
            )),
            _ => None,
        };
        if self.prefix.n_decided() > 0 && self.semantics != Semantics::Ground {
            let encoding = SatEncoding::FixPartial(&self.prefix);
            generator.add_encoding(&encoding)?;
            if let Some(m) = maximizer.as_mut() {
                m.add_processing_encoding(&encoding)?;
            }
        }
        if self.semantics.uses_bipolar_pruning() {
            let bipolarities = RelativeKBipolarClassifier::new_with_sat_solver_factory(
                self.adf,
                &self.mapping,
                self.config.k,
                self.config.branching,
                self.share_factory(),
            )
            .classify()?;
            let encoding = SatEncoding::RelativeKBipolar(&bipolarities);
            generator.add_encoding(&encoding)?;
            if let Some(m) = maximizer.as_mut() {
                m.add_processing_encoding(&encoding)?;
            }
        }
        Ok(InterpretationIterator {
            generator,
            verifier,
            maximizer,
            prefix: &self.prefix,
        })
    }

    /// Computes all the interpretations of the semantics.
    pub fn compute_all(&self) -> Result<Vec<Interpretation>> {
        self.iter()?.collect()
    }

    /// Computes an interpretation of the semantics, if one exists.
    pub fn compute_one(&self) -> Result<Option<Interpretation>> {
        self.iter()?.next().transpose()
    }
}

/// An iterator over the interpretations computed by an [`AdfReasoner`].
///
/// The iterator stops after the first error.
pub struct InterpretationIterator<'r, T>
where
    T: LabelType,
{
    generator: CandidateGenerator<'r, T>,
    verifier: Option<Box<dyn Verifier + 'r>>,
    maximizer: Option<Maximizer<'r, T>>,
    prefix: &'r Interpretation,
}

impl<T> InterpretationIterator<'_, T>
where
    T: LabelType,
{
    fn process(&mut self, candidate: Interpretation) -> Result<Option<Interpretation>> {
        if !candidate.extends(self.prefix) {
            return Ok(None);
        }
        if let Some(v) = self.verifier.as_mut() {
            if !v.verify(&candidate)? {
                return Ok(None);
            }
        }
        match self.maximizer.as_ref() {
            Some(m) => {
                let maximal = m.maximize(&candidate, self.verifier.as_deref_mut())?;
                self.generator
                    .add_encoding(&SatEncoding::RefineLarger(&maximal))?;
                Ok(Some(maximal))
            }
            None => Ok(Some(candidate)),
        }
    }
}

impl<T> Iterator for InterpretationIterator<'_, T>
where
    T: LabelType,
{
    type Item = Result<Interpretation>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let candidate = match self.generator.next()? {
                Ok(c) => c,
                Err(e) => return Some(Err(e)),
            };
            match self.process(candidate) {
                Ok(Some(i)) => return Some(Ok(i)),
                Ok(None) => continue,
                Err(e) => {
                    self.generator.poison();
                    return Some(Err(e));
                }
            }
        }
    }
}
