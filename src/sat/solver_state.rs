use super::{Assignment, Clause, Literal, SatSolver};
use crate::error::{Error, Result};
use log::trace;

/// The status of a [`SolverState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateStatus {
    /// The state may still be satisfiable.
    Open,
    /// The state has been poisoned; every subsequent check fails.
    Exhausted,
}

/// A session over an incremental SAT solver.
///
/// A state owns its solver and accumulates clauses monotonically: there is no way to retract a clause.
/// Assumptions given by [`assume`](Self::assume) only hold for the next call to [`satisfiable`](Self::satisfiable),
/// and the witness of a satisfiable check may only be fetched once, before any other operation on the state.
///
/// A state goes from [`StateStatus::Open`] to [`StateStatus::Exhausted`] exactly once, through [`poison`](Self::poison);
/// it never goes back.
/// An exhausted state answers `false` to every check without querying the solver and ignores new clauses.
///
/// # Example
///
/// ```
/// # use crustadf::sat::{self, Literal, SolverState};
/// let mut state = SolverState::new(sat::default_solver());
/// state.add(vec![Literal::from(1), Literal::from(2)]).unwrap();
/// state.assume(&[Literal::from(-1)]).unwrap();
/// assert!(state.satisfiable().unwrap());
/// assert_eq!(Some(true), state.witness().unwrap().value_of(2));
/// state.poison();
/// assert!(!state.satisfiable().unwrap());
/// ```
pub struct SolverState {
    solver: Box<dyn SatSolver>,
    status: StateStatus,
    assumptions: Vec<Literal>,
    witness: Option<Assignment>,
    has_empty_clause: bool,
    n_known_vars: usize,
    n_clauses: usize,
}

impl SolverState {
    /// Builds a new open state over the given solver.
    pub fn new(solver: Box<dyn SatSolver>) -> Self {
        let n_known_vars = solver.n_vars();
        Self {
            solver,
            status: StateStatus::Open,
            assumptions: vec![],
            witness: None,
            has_empty_clause: false,
            n_known_vars,
            n_clauses: 0,
        }
    }

    /// Returns the status of this state.
    pub fn status(&self) -> StateStatus {
        self.status
    }

    /// Returns `true` iff this state has been poisoned.
    pub fn is_exhausted(&self) -> bool {
        self.status == StateStatus::Exhausted
    }

    /// Declares that variables up to `new_max_id` belong to this state.
    ///
    /// Assumptions can only be made over declared variables or variables occurring in clauses.
    pub fn reserve(&mut self, new_max_id: usize) {
        if new_max_id > self.n_known_vars {
            self.n_known_vars = new_max_id;
            self.solver.reserve(new_max_id);
        }
    }

    /// Adds a clause permanently.
    ///
    /// Adding a clause invalidates the current witness.
    /// Clauses added to an exhausted state are ignored.
    pub fn add(&mut self, clause: Clause) -> Result<()> {
        self.witness = None;
        if self.is_exhausted() {
            return Ok(());
        }
        if clause.is_empty() {
            self.has_empty_clause = true;
            return Ok(());
        }
        let max_var = clause
            .iter()
            .map(|l| usize::from(l.var()))
            .max()
            .unwrap_or_default();
        self.reserve(max_var);
        self.n_clauses += 1;
        self.solver.add_clause(clause)
    }

    /// Adds a set of clauses permanently.
    pub fn add_all<I>(&mut self, clauses: I) -> Result<()>
    where
        I: IntoIterator<Item = Clause>,
    {
        clauses.into_iter().try_for_each(|cl| self.add(cl))
    }

    /// Sets assumptions for the next satisfiability check.
    ///
    /// Assumptions accumulate until the next check.
    /// Assuming a literal whose variable is unknown to this state is an error.
    pub fn assume(&mut self, literals: &[Literal]) -> Result<()> {
        self.witness = None;
        if let Some(l) = literals
            .iter()
            .find(|l| usize::from(l.var()) > self.n_known_vars)
        {
            return Err(Error::InvalidQuery(format!(
                "literal {} is out of the {} known variables",
                l, self.n_known_vars
            )));
        }
        self.assumptions.extend_from_slice(literals);
        Ok(())
    }

    /// Checks the satisfiability of the clauses added so far under the pending assumptions.
    ///
    /// Pending assumptions are consumed.
    /// In case the problem is satisfiable, the witness can be fetched by [`witness`](Self::witness).
    /// A solver failing to decide the problem results in an [`Error::OracleUnavailable`] error.
    pub fn satisfiable(&mut self) -> Result<bool> {
        self.witness = None;
        let assumptions = std::mem::take(&mut self.assumptions);
        if self.is_exhausted() || self.has_empty_clause {
            trace!("skipping SAT check on an unsatisfiable state");
            return Ok(false);
        }
        trace!(
            "checking a state with {} variables, {} clauses and {} assumptions",
            self.n_known_vars,
            self.n_clauses,
            assumptions.len()
        );
        match self.solver.solve_under_assumptions(&assumptions)?.into_model()? {
            Some(assignment) => {
                trace!("SAT check result is SAT");
                self.witness = Some(assignment);
                Ok(true)
            }
            None => {
                trace!("SAT check result is UNSAT");
                Ok(false)
            }
        }
    }

    /// Returns the witness of the last satisfiability check.
    ///
    /// The witness is only available once, immediately after a check that returned `true`;
    /// requesting it in any other situation is an error.
    pub fn witness(&mut self) -> Result<Assignment> {
        self.witness.take().ok_or_else(|| {
            Error::InvalidQuery(
                "a witness was requested without a preceding satisfiable check".to_string(),
            )
        })
    }

    /// Checks the satisfiability under some assumptions and returns the witness, if any.
    pub fn find_witness(&mut self, assumptions: &[Literal]) -> Result<Option<Assignment>> {
        self.assume(assumptions)?;
        if self.satisfiable()? {
            self.witness().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Poisons this state, making it unsatisfiable forever.
    pub fn poison(&mut self) {
        self.status = StateStatus::Exhausted;
        self.assumptions.clear();
        self.witness = None;
    }
}
