use super::cadical_solver::CadicalSolver;
use crate::error::{Error, Result};
use std::{
    fmt::Display,
    num::{NonZeroIsize, NonZeroUsize},
};

/// A variable in a SAT solver.
///
/// A variable is represented by a non-null positive integer.
/// It can be obtained through the [From] trait from an integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable(NonZeroUsize);

macro_rules! impl_var_from {
    ($t: ty) => {
        impl From<$t> for Variable {
            fn from(v: $t) -> Self {
                Self(NonZeroUsize::try_from(v as usize).unwrap())
            }
        }
    };
}
impl_var_from!(usize);
impl_var_from!(u64);
impl_var_from!(u32);

macro_rules! impl_var_from_neg {
    ($t: ty) => {
        impl From<$t> for Variable {
            fn from(v: $t) -> Self {
                if v < 0 {
                    panic!("cannot build a variable from a negative integer")
                }
                Self(NonZeroUsize::try_from(v as usize).unwrap())
            }
        }
    };
}
impl_var_from_neg!(isize);
impl_var_from_neg!(i64);
impl_var_from_neg!(i32);

impl From<Variable> for usize {
    fn from(v: Variable) -> Self {
        v.0.into()
    }
}

impl Variable {
    /// Returns the positive literal of this variable.
    pub fn positive(self) -> Literal {
        Literal(NonZeroIsize::try_from(self.0.get() as isize).unwrap())
    }

    /// Returns the negative literal of this variable.
    pub fn negative(self) -> Literal {
        self.positive().negate()
    }
}

/// A literal in a SAT solver.
///
/// A literal is represented by a non-null integer.
/// It can be obtained through the [From] trait from a signed integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal(NonZeroIsize);

impl Literal {
    /// Returns the opposite literal.
    pub fn negate(self) -> Self {
        Self::from(-self.0.get())
    }

    /// Returns the variable of this literal.
    pub fn var(&self) -> Variable {
        Variable(self.0.unsigned_abs())
    }

    /// Returns `true` iff this literal is the positive literal of its variable.
    pub fn is_positive(&self) -> bool {
        self.0.get() > 0
    }
}

macro_rules! impl_lit_from {
    ($t: ty) => {
        impl From<$t> for Literal {
            fn from(l: $t) -> Self {
                Self(NonZeroIsize::try_from(l as isize).unwrap())
            }
        }
    };
}
impl_lit_from!(isize);
impl_lit_from!(i64);
impl_lit_from!(i32);

impl From<Literal> for isize {
    fn from(l: Literal) -> Self {
        l.0.into()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A clause, as a disjunction of literals.
pub type Clause = Vec<Literal>;

/// Builds a clause from a list of integers.
#[macro_export]
macro_rules! clause {
    () => (
        vec![] as Vec<$crate::sat::Literal>
    );
    ($($x:expr),+ $(,)?) => (
        [$($x),+].into_iter().map($crate::sat::Literal::from).collect::<Vec<$crate::sat::Literal>>()
    );
}

/// An assignment of a set of variables.
///
/// Inside the set of variables involved in the assignment, some may be unassigned.
/// This is the reason why accessors to assigned value returns an [Option<bool>].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment(Vec<Option<bool>>);

impl Assignment {
    pub(crate) fn new(assignment: Vec<Option<bool>>) -> Self {
        Self(assignment)
    }

    /// Returns the value potentially assigned to the variable.
    ///
    /// The result in an [Option].
    /// In case the variable is not assigned, or is unknown to the solver that produced the assignment, [Option::None] is returned.
    /// Else, [Option::Some] is returned and contains the assigned value.
    pub fn value_of<T>(&self, v: T) -> Option<bool>
    where
        T: Into<Variable>,
    {
        self.0.get(usize::from(v.into()) - 1).copied().flatten()
    }

    /// Returns the truth value of a literal, considering unassigned variables as false.
    pub fn satisfies(&self, l: Literal) -> bool {
        self.value_of(l.var()).unwrap_or(false) == l.is_positive()
    }
}

/// The result of a call to a SAT solver.
#[derive(Debug, PartialEq, Eq)]
pub enum SolvingResult {
    /// The problem is satisfiable, and a model is given.
    Satisfiable(Assignment),
    /// The problem is unsatisfiable.
    Unsatisfiable,
    /// The solver did not succeed to decide the problem.
    Unknown,
}

impl SolvingResult {
    /// Returns the underlying model if it exists, or [Option::None].
    ///
    /// If the solving result is [SolvingResult::Unknown], an [`Error::OracleUnavailable`] error is returned.
    pub fn into_model(self) -> Result<Option<Assignment>> {
        match self {
            SolvingResult::Satisfiable(assignment) => Ok(Some(assignment)),
            SolvingResult::Unsatisfiable => Ok(None),
            SolvingResult::Unknown => Err(Error::OracleUnavailable(
                "the SAT solver returned an unknown result".to_string(),
            )),
        }
    }
}

/// A trait for SAT solvers.
///
/// Solvers are incremental: clauses are added permanently, and assumptions only hold for the next call.
/// Backends report the failures of the underlying solver through [`Result`] values.
pub trait SatSolver {
    /// Adds a clause to this solver.
    fn add_clause(&mut self, cl: Clause) -> Result<()>;

    /// Solves the problem formed by the clauses added so far.
    fn solve(&mut self) -> Result<SolvingResult> {
        self.solve_under_assumptions(&[])
    }

    /// Solves the problem formed by the clauses added so far and the provided assumptions.
    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> Result<SolvingResult>;

    /// Returns the number of variables known by the solver.
    fn n_vars(&self) -> usize;

    /// Informs the solver that variables up to `new_max_id` may be used.
    fn reserve(&mut self, new_max_id: usize);
}

/// The type of the functions used to create new SAT solvers.
pub type SatSolverFactoryFn = dyn Fn() -> Box<dyn SatSolver>;

/// The default SAT solver (Cadical).
pub fn default_solver() -> Box<dyn SatSolver> {
    Box::new(CadicalSolver::default())
}
