use super::grounded_fixpoint::run_fixpoint;
use crate::{
    adf::{AbstractDialecticalFramework, Interpretation, LabelType},
    encodings::{PropositionalMapping, SatEncoding, VarAllocator},
    error::Result,
    sat::{self, SatSolver, SolverState},
};
use log::debug;

/// The kinds of interpretations a [`CandidateGenerator`] can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// Conflict-free interpretations.
    ConflictFree,
    /// Two-valued models.
    TwoValuedModel,
    /// The grounded interpretation.
    Grounded,
}

impl CandidateKind {
    fn base_encoding(&self) -> SatEncoding<'static> {
        match self {
            CandidateKind::ConflictFree => SatEncoding::ConflictFree,
            CandidateKind::TwoValuedModel => SatEncoding::TwoValuedModel,
            CandidateKind::Grounded => SatEncoding::Links,
        }
    }
}

/// A session producing distinct candidate interpretations.
///
/// A generator owns a solver session initialized with the base encoding of its [`CandidateKind`].
/// Each call to [`generate`](Self::generate) returns a new interpretation, never returned before by this generator,
/// or `None` when no more interpretation exists.
/// Once `None` has been returned, the session is poisoned and each subsequent call returns `None`.
///
/// The grounded kind does not enumerate: the first call returns the grounded interpretation and poisons the session.
///
/// Additional constraints can be added to the session with [`add_encoding`](Self::add_encoding).
///
/// # Example
///
/// ```
/// # use crustadf::adf::{AcceptanceCondition, AdfBuilder, ArgumentSet};
/// # use crustadf::encodings::PropositionalMapping;
/// # use crustadf::solvers::{CandidateGenerator, CandidateKind};
/// let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(&["a", "b"]));
/// builder.set_acceptance_condition(&"a", AcceptanceCondition::negation(AcceptanceCondition::argument("b"))).unwrap();
/// builder.set_acceptance_condition(&"b", AcceptanceCondition::negation(AcceptanceCondition::argument("a"))).unwrap();
/// let adf = builder.build();
/// let mapping = PropositionalMapping::new(&adf);
/// let mut generator = CandidateGenerator::new(CandidateKind::TwoValuedModel, &adf, &mapping).unwrap();
/// let mut n_models = 0;
/// while let Some(model) = generator.generate().unwrap() {
///     assert!(model.is_total());
///     n_models += 1;
/// }
/// assert_eq!(2, n_models);
/// assert!(generator.generate().unwrap().is_none());
/// ```
pub struct CandidateGenerator<'a, T>
where
    T: LabelType,
{
    kind: CandidateKind,
    adf: &'a AbstractDialecticalFramework<T>,
    mapping: &'a PropositionalMapping,
    vars: VarAllocator,
    state: SolverState,
}

impl<'a, T> CandidateGenerator<'a, T>
where
    T: LabelType,
{
    /// Builds a new generator using the default SAT solver.
    pub fn new(
        kind: CandidateKind,
        adf: &'a AbstractDialecticalFramework<T>,
        mapping: &'a PropositionalMapping,
    ) -> Result<Self> {
        Self::initialize(kind, adf, mapping, sat::default_solver())
    }

    /// Builds a new generator on top of the given SAT solver, and adds the base encoding for the kind of candidates.
    pub fn initialize(
        kind: CandidateKind,
        adf: &'a AbstractDialecticalFramework<T>,
        mapping: &'a PropositionalMapping,
        solver: Box<dyn SatSolver>,
    ) -> Result<Self> {
        let mut state = SolverState::new(solver);
        let mut vars = VarAllocator::new(mapping);
        state.reserve(mapping.n_base_vars());
        state.add_all(kind.base_encoding().encode(adf, mapping, &mut vars)?)?;
        Ok(Self {
            kind,
            adf,
            mapping,
            vars,
            state,
        })
    }

    /// Returns the kind of candidates produced by this generator.
    pub fn kind(&self) -> CandidateKind {
        self.kind
    }

    /// Adds an encoding to the session of this generator.
    pub fn add_encoding(&mut self, encoding: &SatEncoding) -> Result<()> {
        self.state
            .add_all(encoding.encode(self.adf, self.mapping, &mut self.vars)?)
    }

    /// Returns the next candidate, or `None` if no more candidate exists.
    pub fn generate(&mut self) -> Result<Option<Interpretation>> {
        if self.state.is_exhausted() {
            return Ok(None);
        }
        if self.kind == CandidateKind::Grounded {
            let outcome = run_fixpoint(self.adf, self.mapping, &mut self.vars, &mut self.state);
            self.state.poison();
            return outcome.map(|o| Some(o.interpretation));
        }
        if !self.state.satisfiable()? {
            debug!("no more {:?} candidate", self.kind);
            self.state.poison();
            return Ok(None);
        }
        let candidate = self
            .mapping
            .interpretation_from_witness(&self.state.witness()?);
        self.add_encoding(&SatEncoding::RefineUnequal(&candidate))?;
        debug!(
            "new {:?} candidate with {} decided argument(s)",
            self.kind,
            candidate.n_decided()
        );
        Ok(Some(candidate))
    }

    /// Returns `true` iff this generator will not produce any more candidate.
    pub fn is_exhausted(&self) -> bool {
        self.state.is_exhausted()
    }

    /// Stops this generator.
    pub fn poison(&mut self) {
        self.state.poison()
    }
}

impl<T> Iterator for CandidateGenerator<'_, T>
where
    T: LabelType,
{
    type Item = Result<Interpretation>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.generate().transpose();
        if matches!(result, Some(Err(_))) {
            self.poison();
        }
        result
    }
}
