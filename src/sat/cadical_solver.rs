use super::{sat_solver::SolvingResult, Assignment, Clause, Literal, SatSolver};
use crate::error::Result;
use cadical::Solver as CadicalCSolver;

/// A wrapper around the Cadical SAT solver.
#[derive(Default)]
pub struct CadicalSolver {
    solver: CadicalCSolver,
    n_reserved: usize,
}

impl SatSolver for CadicalSolver {
    fn add_clause(&mut self, cl: Clause) -> Result<()> {
        self.solver
            .add_clause(cl.into_iter().map(|l| isize::from(l) as i32));
        Ok(())
    }

    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> Result<SolvingResult> {
        let result = match self
            .solver
            .solve_with(assumptions.iter().map(|l| isize::from(*l) as i32))
        {
            Some(true) => {
                let assignment = Assignment::new(
                    (1..=self.solver.max_variable())
                        .map(|i| self.solver.value(i))
                        .collect(),
                );
                SolvingResult::Satisfiable(assignment)
            }
            Some(false) => SolvingResult::Unsatisfiable,
            None => SolvingResult::Unknown,
        };
        Ok(result)
    }

    fn n_vars(&self) -> usize {
        usize::max(self.solver.max_variable() as usize, self.n_reserved)
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.n_reserved = usize::max(self.n_reserved, new_max_id);
    }
}
