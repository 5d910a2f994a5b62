use super::VarAllocator;
use crate::{
    adf::AcceptanceCondition,
    error::FormulaError,
    sat::{Clause, Literal},
};

/// Compiles acceptance conditions into clauses using the Tseitin transformation.
///
/// The transformer walks the formula once and introduces one auxiliary variable per connective node,
/// so the number of clauses is linear in the size of the formula.
/// The literal returned by [`compile`](Self::compile) is equivalent to the formula under the clauses it produces,
/// in which arguments are replaced by the literals given by the lookup function.
///
/// Auxiliary variables are requested to the [`VarAllocator`] of the session the clauses are meant for.
///
/// # Example
///
/// ```
/// # use crustadf::adf::{AcceptanceCondition, AdfBuilder, ArgumentSet};
/// # use crustadf::encodings::{PropositionalMapping, TseitinTransformer, VarAllocator};
/// # use crustadf::sat::{self, SolverState};
/// let adf = AdfBuilder::new(ArgumentSet::new_with_labels(&["a", "b"])).build();
/// let mapping = PropositionalMapping::new(&adf);
/// let mut vars = VarAllocator::new(&mapping);
/// let mut transformer = TseitinTransformer::new(&mut vars, |a| Some(mapping.true_lit(a)));
/// let formula = AcceptanceCondition::disjunction(vec![
///     AcceptanceCondition::argument(0),
///     AcceptanceCondition::negation(AcceptanceCondition::argument(1)),
/// ]);
/// let mut clauses = vec![];
/// let p = transformer.compile(&formula, &mut clauses).unwrap();
/// let mut state = SolverState::new(sat::default_solver());
/// state.reserve(mapping.n_base_vars());
/// state.add_all(clauses).unwrap();
/// state.assume(&[p.negate(), mapping.true_lit(0)]).unwrap();
/// assert!(!state.satisfiable().unwrap());
/// ```
pub struct TseitinTransformer<'a, F>
where
    F: Fn(usize) -> Option<Literal>,
{
    vars: &'a mut VarAllocator,
    lookup: F,
}

impl<'a, F> TseitinTransformer<'a, F>
where
    F: Fn(usize) -> Option<Literal>,
{
    /// Builds a new transformer.
    ///
    /// The lookup function gives the literal to use for each argument id.
    pub fn new(vars: &'a mut VarAllocator, lookup: F) -> Self {
        Self { vars, lookup }
    }

    /// Compiles a formula, pushing the produced clauses into the provided vector.
    ///
    /// Returns the literal representing the formula.
    /// In case of error, some clauses may have been pushed already;
    /// they only constrain auxiliary variables and can be dropped safely.
    pub fn compile(
        &mut self,
        formula: &AcceptanceCondition<usize>,
        clauses: &mut Vec<Clause>,
    ) -> Result<Literal, FormulaError> {
        match formula {
            AcceptanceCondition::Tautology => {
                let x = self.vars.fresh_lit();
                clauses.push(vec![x]);
                Ok(x)
            }
            AcceptanceCondition::Contradiction => {
                let x = self.vars.fresh_lit();
                clauses.push(vec![x.negate()]);
                Ok(x)
            }
            AcceptanceCondition::Argument(a) => {
                (self.lookup)(*a).ok_or(FormulaError::UnboundArgument(*a))
            }
            AcceptanceCondition::Negation(c) => Ok(self.compile(c, clauses)?.negate()),
            AcceptanceCondition::Conjunction(cs) => {
                let children = self.compile_all(cs, clauses)?;
                let x = self.vars.fresh_lit();
                let mut long_clause = Vec::with_capacity(children.len() + 1);
                long_clause.push(x);
                for c in children {
                    clauses.push(vec![x.negate(), c]);
                    long_clause.push(c.negate());
                }
                clauses.push(long_clause);
                Ok(x)
            }
            AcceptanceCondition::Disjunction(cs) => {
                let children = self.compile_all(cs, clauses)?;
                let x = self.vars.fresh_lit();
                let mut long_clause = Vec::with_capacity(children.len() + 1);
                long_clause.push(x.negate());
                for c in children {
                    clauses.push(vec![x, c.negate()]);
                    long_clause.push(c);
                }
                clauses.push(long_clause);
                Ok(x)
            }
            AcceptanceCondition::Implication(l, r) => {
                let l = self.compile(l, clauses)?;
                let r = self.compile(r, clauses)?;
                let x = self.vars.fresh_lit();
                clauses.push(vec![x.negate(), l.negate(), r]);
                clauses.push(vec![x, l]);
                clauses.push(vec![x, r.negate()]);
                Ok(x)
            }
            AcceptanceCondition::Equivalence(cs) => {
                if cs.len() < 2 {
                    return Err(FormulaError::UnsupportedArity {
                        connective: "equivalence",
                        arity: cs.len(),
                    });
                }
                let children = self.compile_all(cs, clauses)?;
                let x = self.vars.fresh_lit();
                for (i, c) in children.iter().enumerate() {
                    let next = children[(i + 1) % children.len()];
                    clauses.push(vec![x.negate(), c.negate(), next]);
                }
                let mut all_true = children.iter().map(|c| c.negate()).collect::<Clause>();
                all_true.push(x);
                clauses.push(all_true);
                let mut all_false = children.clone();
                all_false.push(x);
                clauses.push(all_false);
                Ok(x)
            }
            AcceptanceCondition::ExclusiveDisjunction(l, r) => {
                let l = self.compile(l, clauses)?;
                let r = self.compile(r, clauses)?;
                let x = self.vars.fresh_lit();
                clauses.push(vec![x.negate(), l, r]);
                clauses.push(vec![x.negate(), l.negate(), r.negate()]);
                clauses.push(vec![x, l.negate(), r]);
                clauses.push(vec![x, l, r.negate()]);
                Ok(x)
            }
        }
    }

    fn compile_all(
        &mut self,
        formulas: &[AcceptanceCondition<usize>],
        clauses: &mut Vec<Clause>,
    ) -> Result<Vec<Literal>, FormulaError> {
        formulas.iter().map(|f| self.compile(f, clauses)).collect()
    }
}
