use super::Verifier;
use crate::{
    adf::{AbstractDialecticalFramework, Interpretation, LabelType},
    encodings::{PropositionalMapping, SatEncoding, VarAllocator},
    error::Result,
    sat::{self, Clause, SatSolverFactoryFn, SolverState},
};
use log::debug;

/// Extends interpretations to maximal ones in the information order.
///
/// Given a starting interpretation, the maximizer looks for a strictly larger conflict-free interpretation.
/// When a verifier is provided, a larger interpretation is only kept if the verifier accepts it;
/// rejected interpretations are excluded and the search goes on from the same interpretation.
/// The search stops when no larger interpretation remains.
///
/// Each call to [`maximize`](Self::maximize) uses a new solver session which is discarded at the end of the call.
/// All these sessions use the same variables, whatever the number of previous calls.
///
/// # Example
///
/// ```
/// # use crustadf::adf::{AcceptanceCondition, AdfBuilder, ArgumentSet, Interpretation};
/// # use crustadf::encodings::PropositionalMapping;
/// # use crustadf::solvers::Maximizer;
/// let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(&["a", "b"]));
/// builder.set_acceptance_condition(&"a", AcceptanceCondition::negation(AcceptanceCondition::argument("b"))).unwrap();
/// builder.set_acceptance_condition(&"b", AcceptanceCondition::negation(AcceptanceCondition::argument("a"))).unwrap();
/// let adf = builder.build();
/// let mapping = PropositionalMapping::new(&adf);
/// let maximizer = Maximizer::new(&adf, &mapping);
/// let maximal = maximizer.maximize(&Interpretation::undecided(&adf), None).unwrap();
/// assert!(maximal.is_total());
/// ```
pub struct Maximizer<'a, T>
where
    T: LabelType,
{
    adf: &'a AbstractDialecticalFramework<T>,
    mapping: &'a PropositionalMapping,
    solver_factory: Box<SatSolverFactoryFn>,
    processing_clauses: Vec<Clause>,
    processing_vars: VarAllocator,
}

impl<'a, T> Maximizer<'a, T>
where
    T: LabelType,
{
    /// Builds a new maximizer.
    ///
    /// The underlying SAT solver is one returned by [default_solver](crate::sat::default_solver).
    pub fn new(adf: &'a AbstractDialecticalFramework<T>, mapping: &'a PropositionalMapping) -> Self {
        Self::new_with_sat_solver_factory(adf, mapping, Box::new(|| sat::default_solver()))
    }

    /// Builds a new maximizer.
    ///
    /// The SAT solver to use in given through the solver factory.
    pub fn new_with_sat_solver_factory(
        adf: &'a AbstractDialecticalFramework<T>,
        mapping: &'a PropositionalMapping,
        solver_factory: Box<SatSolverFactoryFn>,
    ) -> Self {
        Self {
            adf,
            mapping,
            solver_factory,
            processing_clauses: vec![],
            processing_vars: VarAllocator::new(mapping),
        }
    }

    /// Adds an encoding to the sessions used by the maximization processes.
    ///
    /// The encoding must not exclude any interpretation the verifier would accept.
    pub fn add_processing_encoding(&mut self, encoding: &SatEncoding) -> Result<()> {
        let mut clauses = encoding.encode(self.adf, self.mapping, &mut self.processing_vars)?;
        self.processing_clauses.append(&mut clauses);
        Ok(())
    }

    /// Computes a maximal extension of the given interpretation.
    ///
    /// If a verifier is given, only the interpretations it accepts are considered as extensions.
    /// The starting interpretation is not checked by the verifier.
    pub fn maximize<'v>(
        &self,
        start: &Interpretation,
        mut verifier: Option<&mut (dyn Verifier + 'v)>,
    ) -> Result<Interpretation> {
        let mut state = SolverState::new((self.solver_factory)());
        let mut vars = self.processing_vars.clone();
        state.reserve(self.mapping.n_base_vars());
        state.add_all(self.processing_clauses.iter().cloned())?;
        state.add_all(SatEncoding::ConflictFree.encode(self.adf, self.mapping, &mut vars)?)?;
        let mut current = start.clone();
        state.add_all(SatEncoding::Larger(&current).encode(self.adf, self.mapping, &mut vars)?)?;
        while state.satisfiable()? {
            let candidate = self
                .mapping
                .interpretation_from_witness(&state.witness()?);
            let accepted = match verifier.as_mut() {
                Some(v) => v.verify(&candidate)?,
                None => true,
            };
            if accepted {
                debug!(
                    "maximization step: {} -> {} decided argument(s)",
                    current.n_decided(),
                    candidate.n_decided()
                );
                current = candidate;
                state.add_all(SatEncoding::Larger(&current).encode(self.adf, self.mapping, &mut vars)?)?;
            } else {
                state.add_all(
                    SatEncoding::RefineUnequal(&candidate).encode(self.adf, self.mapping, &mut vars)?,
                )?;
            }
        }
        state.poison();
        Ok(current)
    }
}
