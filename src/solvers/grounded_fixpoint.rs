use crate::{
    adf::{AbstractDialecticalFramework, Interpretation, LabelType, TruthValue},
    encodings::{compile_acceptance_condition, PropositionalMapping, SatEncoding, VarAllocator},
    error::{Error, Result},
    sat::{self, Literal, SatSolverFactoryFn, SolverState},
};
use log::{debug, warn};

/// The result of a grounded fixpoint computation.
#[derive(Debug)]
pub struct FixpointOutcome {
    /// The grounded interpretation.
    pub interpretation: Interpretation,
    /// The errors raised by the acceptance conditions that could not be compiled.
    ///
    /// The corresponding arguments are left undecided.
    pub malformed: Vec<Error>,
    /// The number of iterations, the last one (which does not change the interpretation) included.
    pub n_iterations: usize,
}

/// Computes the grounded interpretation of an ADF using a SAT solver.
///
/// Starting from the interpretation in which each argument is undecided,
/// the computation fixes the values of the decided arguments and checks, for each argument,
/// whether its acceptance condition is valid or unsatisfiable under every completion of the current interpretation.
/// Arguments are set to true or false accordingly, and the process is repeated until the interpretation does not change.
/// The number of iterations is bounded by the number of arguments.
///
/// Acceptance conditions are compiled once, before the first iteration.
/// An argument whose acceptance condition cannot be compiled stays undecided;
/// the error is logged and reported by [`compute_with_report`](Self::compute_with_report).
///
/// # Example
///
/// ```
/// # use crustadf::adf::{AcceptanceCondition, AdfBuilder, ArgumentSet, TruthValue};
/// # use crustadf::encodings::PropositionalMapping;
/// # use crustadf::solvers::GroundedFixpoint;
/// let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(&["a", "b"]));
/// builder.set_acceptance_condition(&"b", AcceptanceCondition::argument("a")).unwrap();
/// let adf = builder.build();
/// let mapping = PropositionalMapping::new(&adf);
/// let grounded = GroundedFixpoint::new(&adf, &mapping).compute().unwrap();
/// assert_eq!(TruthValue::True, grounded.value_of_id(1));
/// ```
pub struct GroundedFixpoint<'a, T>
where
    T: LabelType,
{
    adf: &'a AbstractDialecticalFramework<T>,
    mapping: &'a PropositionalMapping,
    solver_factory: Box<SatSolverFactoryFn>,
}

impl<'a, T> GroundedFixpoint<'a, T>
where
    T: LabelType,
{
    /// Builds a new fixpoint computer.
    ///
    /// The underlying SAT solver is one returned by [default_solver](crate::sat::default_solver).
    pub fn new(adf: &'a AbstractDialecticalFramework<T>, mapping: &'a PropositionalMapping) -> Self {
        Self::new_with_sat_solver_factory(adf, mapping, Box::new(|| sat::default_solver()))
    }

    /// Builds a new fixpoint computer.
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
        }
    }

    /// Computes the grounded interpretation.
    pub fn compute(&self) -> Result<Interpretation> {
        self.compute_with_report().map(|o| o.interpretation)
    }

    /// Computes the grounded interpretation, reporting the malformed acceptance conditions and the number of iterations.
    ///
    /// A new solver session is used, and poisoned at the end of the computation.
    pub fn compute_with_report(&self) -> Result<FixpointOutcome> {
        let mut state = SolverState::new((self.solver_factory)());
        let mut vars = VarAllocator::new(self.mapping);
        state.reserve(self.mapping.n_base_vars());
        state.add_all(SatEncoding::Links.encode(self.adf, self.mapping, &mut vars)?)?;
        let outcome = run_fixpoint(self.adf, self.mapping, &mut vars, &mut state);
        state.poison();
        outcome
    }
}

/// Runs the fixpoint computation in a session in which the links encoding was added.
///
/// The allocator must be the one of the session.
/// The session is not poisoned by this function.
pub(crate) fn run_fixpoint<T>(
    adf: &AbstractDialecticalFramework<T>,
    mapping: &PropositionalMapping,
    vars: &mut VarAllocator,
    state: &mut SolverState,
) -> Result<FixpointOutcome>
where
    T: LabelType,
{
    let mut malformed = vec![];
    let mut representatives: Vec<Option<Literal>> = Vec::with_capacity(adf.n_arguments());
    for arg in adf.argument_set().iter() {
        let s = arg.id();
        let mut clauses = vec![];
        match compile_acceptance_condition(
            adf,
            vars,
            s,
            |r| adf.link_between(r, s).map(|l| mapping.link_lit(l)),
            &mut clauses,
        ) {
            Ok(p) => {
                state.add_all(clauses)?;
                representatives.push(Some(p));
            }
            Err(e) => {
                warn!("{}; the argument is left undecided", e);
                malformed.push(e);
                representatives.push(None);
            }
        }
    }
    let mut current = Interpretation::undecided(adf);
    let mut n_iterations = 0;
    loop {
        n_iterations += 1;
        state.add_all(SatEncoding::FixPartial(&current).encode(adf, mapping, vars)?)?;
        let mut next_values = Vec::with_capacity(adf.n_arguments());
        for (s, p) in representatives.iter().enumerate() {
            let value = match p {
                _ if current.value_of_id(s).is_decided() => current.value_of_id(s),
                Some(p) => entailed_value(state, *p)?,
                None => TruthValue::Undecided,
            };
            next_values.push(value);
        }
        let next = Interpretation::from_values(next_values);
        debug!(
            "grounded fixpoint iteration {}: {} decided argument(s)",
            n_iterations,
            next.n_decided()
        );
        if next == current {
            return Ok(FixpointOutcome {
                interpretation: current,
                malformed,
                n_iterations,
            });
        }
        current = next;
    }
}

fn entailed_value(state: &mut SolverState, p: Literal) -> Result<TruthValue> {
    state.assume(&[p.negate()])?;
    if !state.satisfiable()? {
        return Ok(TruthValue::True);
    }
    state.assume(&[p])?;
    if !state.satisfiable()? {
        return Ok(TruthValue::False);
    }
    Ok(TruthValue::Undecided)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adf::{AcceptanceCondition, AdfBuilder, ArgumentSet, TruthValue::*};

    type Cond = AcceptanceCondition<&'static str>;

    fn build(
        labels: &[&'static str],
        conditions: Vec<(&'static str, Cond)>,
    ) -> AbstractDialecticalFramework<&'static str> {
        let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(labels));
        for (l, c) in conditions {
            builder.set_acceptance_condition(&l, c).unwrap();
        }
        builder.build()
    }

    fn grounded(adf: &AbstractDialecticalFramework<&'static str>) -> FixpointOutcome {
        let mapping = PropositionalMapping::new(adf);
        GroundedFixpoint::new(adf, &mapping).compute_with_report().unwrap()
    }

    #[test]
    fn test_empty_adf() {
        let adf = build(&[], vec![]);
        let outcome = grounded(&adf);
        assert_eq!(Interpretation::default(), outcome.interpretation);
        assert_eq!(1, outcome.n_iterations);
    }

    #[test]
    fn test_chain() {
        let adf = build(
            &["a", "b", "c"],
            vec![
                ("b", Cond::negation(Cond::argument("a"))),
                ("c", Cond::negation(Cond::argument("b"))),
            ],
        );
        let outcome = grounded(&adf);
        assert_eq!(
            Interpretation::from_values(vec![True, False, True]),
            outcome.interpretation
        );
        assert!(outcome.n_iterations <= 4);
    }

    #[test]
    fn test_self_attack() {
        let adf = build(&["a"], vec![("a", Cond::negation(Cond::argument("a")))]);
        assert_eq!(
            Interpretation::from_values(vec![Undecided]),
            grounded(&adf).interpretation
        );
    }

    #[test]
    fn test_tautology_over_undecided_parent() {
        let adf = build(
            &["a", "b"],
            vec![
                ("a", Cond::argument("a")),
                (
                    "b",
                    Cond::disjunction(vec![Cond::argument("a"), Cond::negation(Cond::argument("a"))]),
                ),
            ],
        );
        assert_eq!(
            Interpretation::from_values(vec![Undecided, True]),
            grounded(&adf).interpretation
        );
    }

    #[test]
    fn test_contradiction() {
        let adf = build(
            &["a", "b"],
            vec![
                ("a", Cond::Contradiction),
                ("b", Cond::negation(Cond::argument("a"))),
            ],
        );
        assert_eq!(
            Interpretation::from_values(vec![False, True]),
            grounded(&adf).interpretation
        );
    }

    #[test]
    fn test_malformed_argument_is_undecided() {
        let adf = build(
            &["a", "b", "c"],
            vec![
                ("a", Cond::equivalence(vec![Cond::argument("c")])),
                ("b", Cond::negation(Cond::argument("c"))),
                ("c", Cond::Contradiction),
            ],
        );
        let outcome = grounded(&adf);
        assert_eq!(
            Interpretation::from_values(vec![Undecided, True, False]),
            outcome.interpretation
        );
        assert_eq!(1, outcome.malformed.len());
        assert!(matches!(
            &outcome.malformed[0],
            Error::MalformedAcceptanceCondition { argument, .. } if argument == "a"
        ));
    }

    #[test]
    fn test_is_a_fixpoint() {
        let adf = build(
            &["a", "b", "c", "d"],
            vec![
                ("a", Cond::negation(Cond::argument("b"))),
                ("b", Cond::negation(Cond::argument("a"))),
                (
                    "c",
                    Cond::implication(Cond::argument("d"), Cond::argument("a")),
                ),
                ("d", Cond::Contradiction),
            ],
        );
        let mapping = PropositionalMapping::new(&adf);
        let result = GroundedFixpoint::new(&adf, &mapping).compute().unwrap();
        assert_eq!(
            Interpretation::from_values(vec![Undecided, Undecided, True, False]),
            result
        );
        let mut state = SolverState::new(sat::default_solver());
        let mut vars = VarAllocator::new(&mapping);
        state.reserve(mapping.n_base_vars());
        state
            .add_all(SatEncoding::Links.encode(&adf, &mapping, &mut vars).unwrap())
            .unwrap();
        state
            .add_all(
                SatEncoding::FixPartial(&result)
                    .encode(&adf, &mapping, &mut vars)
                    .unwrap(),
            )
            .unwrap();
        let again = run_fixpoint(&adf, &mapping, &mut vars, &mut state).unwrap();
        assert_eq!(result, again.interpretation);
    }
}
