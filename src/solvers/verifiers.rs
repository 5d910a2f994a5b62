use super::{GroundedFixpoint, Verifier};
use crate::{
    adf::{
        AbstractDialecticalFramework, AcceptanceCondition, AdfBuilder, ArgumentSet,
        Interpretation, LabelType, TruthValue,
    },
    encodings::{compile_acceptance_condition, PropositionalMapping, VarAllocator},
    error::Result,
    sat::{self, Literal, SatSolverFactoryFn, SolverState},
};
use log::debug;
use std::rc::Rc;

// A session in which the acceptance condition of each argument is compiled over two-valued argument values.
// Checks are made under assumptions only, so the session can be reused for any number of candidates.
struct CompletionOracle<'a, T>
where
    T: LabelType,
{
    adf: &'a AbstractDialecticalFramework<T>,
    mapping: &'a PropositionalMapping,
    state: SolverState,
    representatives: Vec<Literal>,
}

impl<'a, T> CompletionOracle<'a, T>
where
    T: LabelType,
{
    fn new(
        adf: &'a AbstractDialecticalFramework<T>,
        mapping: &'a PropositionalMapping,
        solver_factory: &SatSolverFactoryFn,
    ) -> Result<Self> {
        let mut state = SolverState::new(solver_factory());
        let mut vars = VarAllocator::new(mapping);
        state.reserve(mapping.n_base_vars());
        let mut clauses = vec![];
        let representatives = adf
            .argument_set()
            .iter()
            .map(|a| {
                compile_acceptance_condition(
                    adf,
                    &mut vars,
                    a.id(),
                    |r| Some(mapping.true_lit(r)),
                    &mut clauses,
                )
            })
            .collect::<Result<Vec<Literal>>>()?;
        state.add_all(clauses)?;
        Ok(Self {
            adf,
            mapping,
            state,
            representatives,
        })
    }

    fn completion_assumptions(&self, candidate: &Interpretation) -> Vec<Literal> {
        candidate
            .decided()
            .map(|(a, b)| {
                if b {
                    self.mapping.true_lit(a)
                } else {
                    self.mapping.true_lit(a).negate()
                }
            })
            .collect()
    }

    // Checks whether the acceptance condition of the argument can take the given value under a completion of the candidate.
    fn can_take(&mut self, assumptions: &[Literal], arg_id: usize, value: bool) -> Result<bool> {
        let p = self.representatives[arg_id];
        self.state.assume(assumptions)?;
        self.state.assume(&[if value { p } else { p.negate() }])?;
        self.state.satisfiable()
    }

    fn check(&mut self, candidate: &Interpretation, check_undecided: bool) -> Result<bool> {
        let assumptions = self.completion_assumptions(candidate);
        for s in 0..self.adf.n_arguments() {
            let consistent = match candidate.value_of_id(s) {
                TruthValue::True => !self.can_take(&assumptions, s, false)?,
                TruthValue::False => !self.can_take(&assumptions, s, true)?,
                TruthValue::Undecided if check_undecided => {
                    self.can_take(&assumptions, s, true)?
                        && self.can_take(&assumptions, s, false)?
                }
                TruthValue::Undecided => true,
            };
            if !consistent {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Checks whether interpretations are admissible.
///
/// An interpretation is admissible if each argument it accepts (resp. rejects) has an acceptance condition
/// which is true (resp. false) under each completion of the interpretation.
///
/// The verifier owns its own solver session, in which only assumption based checks are made.
///
/// # Example
///
/// ```
/// # use crustadf::adf::{AcceptanceCondition, AdfBuilder, ArgumentSet, Interpretation, TruthValue};
/// # use crustadf::encodings::PropositionalMapping;
/// # use crustadf::solvers::{AdmissibleVerifier, Verifier};
/// let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(&["a", "b"]));
/// builder.set_acceptance_condition(&"b", AcceptanceCondition::argument("a")).unwrap();
/// let adf = builder.build();
/// let mapping = PropositionalMapping::new(&adf);
/// let mut verifier = AdmissibleVerifier::new(&adf, &mapping).unwrap();
/// let only_b = Interpretation::from_values(vec![TruthValue::Undecided, TruthValue::True]);
/// assert!(!verifier.verify(&only_b).unwrap());
/// let both = Interpretation::from_values(vec![TruthValue::True, TruthValue::True]);
/// assert!(verifier.verify(&both).unwrap());
/// ```
pub struct AdmissibleVerifier<'a, T>
where
    T: LabelType,
{
    oracle: CompletionOracle<'a, T>,
}

impl<'a, T> AdmissibleVerifier<'a, T>
where
    T: LabelType,
{
    /// Builds a new verifier using the default SAT solver.
    pub fn new(
        adf: &'a AbstractDialecticalFramework<T>,
        mapping: &'a PropositionalMapping,
    ) -> Result<Self> {
        Self::new_with_sat_solver_factory(adf, mapping, Box::new(|| sat::default_solver()))
    }

    /// Builds a new verifier.
    ///
    /// The SAT solver to use in given through the solver factory.
    pub fn new_with_sat_solver_factory(
        adf: &'a AbstractDialecticalFramework<T>,
        mapping: &'a PropositionalMapping,
        solver_factory: Box<SatSolverFactoryFn>,
    ) -> Result<Self> {
        Ok(Self {
            oracle: CompletionOracle::new(adf, mapping, solver_factory.as_ref())?,
        })
    }
}

impl<T> Verifier for AdmissibleVerifier<'_, T>
where
    T: LabelType,
{
    fn verify(&mut self, candidate: &Interpretation) -> Result<bool> {
        self.oracle.check(candidate, false)
    }
}

/// Checks whether interpretations are complete.
///
/// An interpretation is complete if it is admissible and if the acceptance condition of each undecided argument
/// is neither true under each completion nor false under each completion.
pub struct CompleteVerifier<'a, T>
where
    T: LabelType,
{
    oracle: CompletionOracle<'a, T>,
}

impl<'a, T> CompleteVerifier<'a, T>
where
    T: LabelType,
{
    /// Builds a new verifier using the default SAT solver.
    pub fn new(
        adf: &'a AbstractDialecticalFramework<T>,
        mapping: &'a PropositionalMapping,
    ) -> Result<Self> {
        Self::new_with_sat_solver_factory(adf, mapping, Box::new(|| sat::default_solver()))
    }

    /// Builds a new verifier.
    ///
    /// The SAT solver to use in given through the solver factory.
    pub fn new_with_sat_solver_factory(
        adf: &'a AbstractDialecticalFramework<T>,
        mapping: &'a PropositionalMapping,
        solver_factory: Box<SatSolverFactoryFn>,
    ) -> Result<Self> {
        Ok(Self {
            oracle: CompletionOracle::new(adf, mapping, solver_factory.as_ref())?,
        })
    }
}

impl<T> Verifier for CompleteVerifier<'_, T>
where
    T: LabelType,
{
    fn verify(&mut self, candidate: &Interpretation) -> Result<bool> {
        self.oracle.check(candidate, true)
    }
}

/// Checks whether two-valued models are stable.
///
/// The reduct of an ADF with respect to a model keeps the arguments the model accepts,
/// and replaces the arguments the model rejects by the constant false in their acceptance conditions.
/// A model is stable iff the grounded interpretation of its reduct accepts each argument of the reduct.
///
/// Candidates that are not total are rejected.
/// Each check builds the reduct and runs a [`GroundedFixpoint`] computation on it, in a new solver session.
///
/// # Example
///
/// ```
/// # use crustadf::adf::{AcceptanceCondition, AdfBuilder, ArgumentSet, Interpretation, TruthValue};
/// # use crustadf::solvers::{StableVerifier, Verifier};
/// let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(&["a"]));
/// builder.set_acceptance_condition(&"a", AcceptanceCondition::argument("a")).unwrap();
/// let adf = builder.build();
/// let mut verifier = StableVerifier::new(&adf);
/// assert!(!verifier.verify(&Interpretation::from_values(vec![TruthValue::True])).unwrap());
/// assert!(verifier.verify(&Interpretation::from_values(vec![TruthValue::False])).unwrap());
/// ```
pub struct StableVerifier<'a, T>
where
    T: LabelType,
{
    adf: &'a AbstractDialecticalFramework<T>,
    solver_factory: Rc<SatSolverFactoryFn>,
}

impl<'a, T> StableVerifier<'a, T>
where
    T: LabelType,
{
    /// Builds a new verifier using the default SAT solver.
    pub fn new(adf: &'a AbstractDialecticalFramework<T>) -> Self {
        Self::new_with_sat_solver_factory(adf, Box::new(|| sat::default_solver()))
    }

    /// Builds a new verifier.
    ///
    /// The SAT solver to use in given through the solver factory.
    pub fn new_with_sat_solver_factory(
        adf: &'a AbstractDialecticalFramework<T>,
        solver_factory: Box<SatSolverFactoryFn>,
    ) -> Self {
        Self {
            adf,
            solver_factory: Rc::from(solver_factory),
        }
    }

    // The arguments of the reduct are labeled by their ids in the original framework.
    fn reduct(&self, model: &Interpretation) -> Result<AbstractDialecticalFramework<usize>> {
        let accepted = model.satisfied().collect::<Vec<usize>>();
        let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(&accepted));
        for s in accepted.iter() {
            let condition = self
                .adf
                .acceptance_condition(*s)
                .substitute_arguments(&mut |r| match model.value_of_id(*r) {
                    TruthValue::False => AcceptanceCondition::Contradiction,
                    _ => AcceptanceCondition::argument(*r),
                });
            builder.set_acceptance_condition(s, condition)?;
        }
        Ok(builder.build())
    }
}

impl<T> Verifier for StableVerifier<'_, T>
where
    T: LabelType,
{
    fn verify(&mut self, candidate: &Interpretation) -> Result<bool> {
        if !candidate.is_total() {
            return Ok(false);
        }
        let reduct = self.reduct(candidate)?;
        let mapping = PropositionalMapping::new(&reduct);
        let factory = Rc::clone(&self.solver_factory);
        let grounded = GroundedFixpoint::new_with_sat_solver_factory(
            &reduct,
            &mapping,
            Box::new(move || factory()),
        )
        .compute()?;
        let stable = grounded.satisfied().count() == reduct.n_arguments();
        debug!(
            "model with {} accepted argument(s) is {}stable",
            reduct.n_arguments(),
            if stable { "" } else { "not " }
        );
        Ok(stable)
    }
}
