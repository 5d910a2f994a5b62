use super::{Assignment, Clause, Literal, SatSolver, SolvingResult};
use crate::error::{Error, Result};
use ipasir_loading::{IpasirSolverLoader, IpasirSolverWrapper};
use std::{ffi::OsStr, fmt::Debug};

/// A wrapper for solvers that implement the IPASIR interface.
///
/// Failures of the underlying library are reported as [`Error::OracleUnavailable`].
pub struct IpasirSatSolver {
    solver: IpasirSolverWrapper,
    n_vars: i32,
}

impl IpasirSatSolver {
    /// Builds a new [`IpasirSatSolver`] given the underlying solver.
    pub fn new(solver: IpasirSolverWrapper) -> Self {
        Self { solver, n_vars: 0 }
    }

    /// Builds a new [`IpasirSatSolver`] from the path of a shared library implementing the IPASIR interface.
    ///
    /// A library that cannot be loaded, or that fails to create a solver, results in an [`Error::OracleUnavailable`] error.
    pub fn from_library<P: AsRef<OsStr>>(path: P) -> Result<Self> {
        let loader = IpasirSolverLoader::from_path(path).map_err(oracle_error)?;
        loader.new_solver().map(Self::new).map_err(oracle_error)
    }
}

fn oracle_error<E: Debug>(e: E) -> Error {
    Error::OracleUnavailable(format!("{:?}", e))
}

impl SatSolver for IpasirSatSolver {
    fn add_clause(&mut self, cl: Clause) -> Result<()> {
        for l in cl {
            let i32_lit = isize::from(l) as i32;
            self.solver.ipasir_add(i32_lit).map_err(oracle_error)?;
            self.n_vars = i32::max(self.n_vars, i32_lit.abs());
        }
        self.solver.ipasir_add(0).map_err(oracle_error)
    }

    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> Result<SolvingResult> {
        for l in assumptions {
            let i32_lit = isize::from(*l) as i32;
            self.solver.ipasir_assume(i32_lit).map_err(oracle_error)?;
            self.n_vars = i32::max(self.n_vars, i32_lit.abs());
        }
        let solving_result = match self.solver.ipasir_solve().map_err(oracle_error)? {
            Some(true) => {
                let values = (1..=self.n_vars)
                    .map(|i| self.solver.ipasir_val(i).map_err(oracle_error))
                    .collect::<Result<Vec<Option<bool>>>>()?;
                SolvingResult::Satisfiable(Assignment::new(values))
            }
            Some(false) => SolvingResult::Unsatisfiable,
            None => SolvingResult::Unknown,
        };
        Ok(solving_result)
    }

    fn n_vars(&self) -> usize {
        self.n_vars as usize
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.n_vars = i32::max(self.n_vars, new_max_id as i32)
    }
}
