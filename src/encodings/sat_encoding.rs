use super::{PropositionalMapping, TseitinTransformer, VarAllocator};
use crate::{
    adf::{
        AbstractDialecticalFramework, Interpretation, LabelType, LinkType,
        LinkTypes, TruthValue,
    },
    error::{Error, FormulaError, Result},
    sat::{Clause, Literal},
    solvers::RelativeBipolarity,
};

/// The encodings of ADF related constraints into clauses.
///
/// Encodings do not depend on any solver: they produce clauses that can be given to any number of [`SolverState`](crate::sat::SolverState) objects.
/// They can be composed by concatenating their clauses, since all of them rely on the same [`PropositionalMapping`].
/// The auxiliary variables they need are taken from the [`VarAllocator`] of the state the clauses are given to.
///
/// Encodings compiling acceptance conditions return an [`Error::MalformedAcceptanceCondition`] error
/// if one of them cannot be compiled.
pub enum SatEncoding<'a> {
    /// The link variables take the values of the parents when they are decided, and no argument is both accepted and rejected.
    Links,
    /// [`SatEncoding::Links`], plus: an accepted argument has its acceptance condition satisfied by the link values,
    /// and a rejected one has it falsified.
    ConflictFree,
    /// Each argument is decided, and accepted iff its acceptance condition is true.
    TwoValuedModel,
    /// Excludes the given interpretation, and only this one.
    RefineUnequal(&'a Interpretation),
    /// Forces models to strictly extend the given interpretation in the information order.
    Larger(&'a Interpretation),
    /// Excludes the interpretations that are less or equal to the given one in the information order.
    RefineLarger(&'a Interpretation),
    /// Fixes the values of the decided arguments of the given interpretation.
    FixPartial(&'a Interpretation),
    /// Constraints deduced from the types of the links, for arguments whose incoming links are all bipolar.
    Bipolar(&'a LinkTypes),
    /// Same as [`SatEncoding::Bipolar`], but only for the interpretations extending the assumptions of the classification.
    RelativeBipolar(&'a RelativeBipolarity),
    /// The union of a set of [`SatEncoding::RelativeBipolar`] encodings.
    RelativeKBipolar(&'a [RelativeBipolarity]),
}

impl SatEncoding<'_> {
    /// Produces the clauses of this encoding.
    ///
    /// # Example
    ///
    /// ```
    /// # use crustadf::adf::{AdfBuilder, ArgumentSet, Interpretation, TruthValue};
    /// # use crustadf::encodings::{PropositionalMapping, SatEncoding, VarAllocator};
    /// let adf = AdfBuilder::new(ArgumentSet::new_with_labels(&["a", "b"])).build();
    /// let mapping = PropositionalMapping::new(&adf);
    /// let mut vars = VarAllocator::new(&mapping);
    /// let i = Interpretation::from_values(vec![TruthValue::True, TruthValue::Undecided]);
    /// let clauses = SatEncoding::FixPartial(&i).encode(&adf, &mapping, &mut vars).unwrap();
    /// assert_eq!(vec![vec![mapping.true_lit(0)]], clauses);
    /// ```
    pub fn encode<T>(
        &self,
        adf: &AbstractDialecticalFramework<T>,
        mapping: &PropositionalMapping,
        vars: &mut VarAllocator,
    ) -> Result<Vec<Clause>>
    where
        T: LabelType,
    {
        let mut clauses = vec![];
        match self {
            SatEncoding::Links => encode_links(adf, mapping, &mut clauses),
            SatEncoding::ConflictFree => {
                encode_links(adf, mapping, &mut clauses);
                encode_conflict_freeness(adf, mapping, vars, &mut clauses)?;
            }
            SatEncoding::TwoValuedModel => {
                encode_two_valued_model(adf, mapping, vars, &mut clauses)?
            }
            SatEncoding::RefineUnequal(i) => {
                clauses.push(refine_clause(adf, i, |a, v| match v {
                    TruthValue::True => vec![mapping.true_lit(a).negate()],
                    TruthValue::False => vec![mapping.false_lit(a).negate()],
                    TruthValue::Undecided => vec![mapping.true_lit(a), mapping.false_lit(a)],
                }));
            }
            SatEncoding::Larger(i) => {
                encode_fix_partial(mapping, i, &mut clauses);
                clauses.push(refine_clause(adf, i, |a, v| match v {
                    TruthValue::True | TruthValue::False => vec![],
                    TruthValue::Undecided => vec![mapping.true_lit(a), mapping.false_lit(a)],
                }));
            }
            SatEncoding::RefineLarger(i) => {
                clauses.push(refine_clause(adf, i, |a, v| match v {
                    TruthValue::True => vec![mapping.false_lit(a)],
                    TruthValue::False => vec![mapping.true_lit(a)],
                    TruthValue::Undecided => vec![mapping.true_lit(a), mapping.false_lit(a)],
                }));
            }
            SatEncoding::FixPartial(i) => encode_fix_partial(mapping, i, &mut clauses),
            SatEncoding::Bipolar(link_types) => {
                encode_bipolar(adf, mapping, vars, link_types, &[], &mut clauses)?
            }
            SatEncoding::RelativeBipolar(b) => {
                encode_relative_bipolar(adf, mapping, vars, b, &mut clauses)?
            }
            SatEncoding::RelativeKBipolar(bs) => {
                for b in bs.iter() {
                    encode_relative_bipolar(adf, mapping, vars, b, &mut clauses)?;
                }
            }
        }
        Ok(clauses)
    }
}

fn malformed<T>(adf: &AbstractDialecticalFramework<T>, arg_id: usize, source: FormulaError) -> Error
where
    T: LabelType,
{
    Error::MalformedAcceptanceCondition {
        argument: adf.argument_set().get_argument_by_id(arg_id).to_string(),
        source,
    }
}

pub(crate) fn compile_acceptance_condition<T, F>(
    adf: &AbstractDialecticalFramework<T>,
    vars: &mut VarAllocator,
    arg_id: usize,
    lookup: F,
    clauses: &mut Vec<Clause>,
) -> Result<Literal>
where
    T: LabelType,
    F: Fn(usize) -> Option<Literal>,
{
    let mut local_clauses = vec![];
    let lit = TseitinTransformer::new(vars, lookup)
        .compile(adf.acceptance_condition(arg_id), &mut local_clauses)
        .map_err(|e| malformed(adf, arg_id, e))?;
    clauses.append(&mut local_clauses);
    Ok(lit)
}

fn encode_links<T>(
    adf: &AbstractDialecticalFramework<T>,
    mapping: &PropositionalMapping,
    clauses: &mut Vec<Clause>,
) where
    T: LabelType,
{
    for arg in adf.argument_set().iter() {
        clauses.push(vec![
            mapping.true_lit(arg.id()).negate(),
            mapping.false_lit(arg.id()).negate(),
        ]);
    }
    for link in adf.iter_links() {
        let l = mapping.link_lit(link);
        clauses.push(vec![mapping.true_lit(link.from()).negate(), l]);
        clauses.push(vec![mapping.false_lit(link.from()).negate(), l.negate()]);
    }
}

fn encode_conflict_freeness<T>(
    adf: &AbstractDialecticalFramework<T>,
    mapping: &PropositionalMapping,
    vars: &mut VarAllocator,
    clauses: &mut Vec<Clause>,
) -> Result<()>
where
    T: LabelType,
{
    for arg in adf.argument_set().iter() {
        let s = arg.id();
        let p = compile_acceptance_condition(
            adf,
            vars,
            s,
            |r| adf.link_between(r, s).map(|l| mapping.link_lit(l)),
            clauses,
        )?;
        clauses.push(vec![mapping.true_lit(s).negate(), p]);
        clauses.push(vec![mapping.false_lit(s).negate(), p.negate()]);
    }
    Ok(())
}

fn encode_two_valued_model<T>(
    adf: &AbstractDialecticalFramework<T>,
    mapping: &PropositionalMapping,
    vars: &mut VarAllocator,
    clauses: &mut Vec<Clause>,
) -> Result<()>
where
    T: LabelType,
{
    for arg in adf.argument_set().iter() {
        let s = arg.id();
        let (t, f) = (mapping.true_lit(s), mapping.false_lit(s));
        clauses.push(vec![t, f]);
        clauses.push(vec![t.negate(), f.negate()]);
        let p =
            compile_acceptance_condition(adf, vars, s, |r| Some(mapping.true_lit(r)), clauses)?;
        clauses.push(vec![t.negate(), p]);
        clauses.push(vec![t, p.negate()]);
    }
    Ok(())
}

fn refine_clause<T, F>(
    adf: &AbstractDialecticalFramework<T>,
    interpretation: &Interpretation,
    literals_for: F,
) -> Clause
where
    T: LabelType,
    F: Fn(usize, TruthValue) -> Vec<Literal>,
{
    adf.argument_set()
        .iter()
        .flat_map(|a| literals_for(a.id(), interpretation.value_of(a)))
        .collect()
}

fn encode_fix_partial(
    mapping: &PropositionalMapping,
    interpretation: &Interpretation,
    clauses: &mut Vec<Clause>,
) {
    for (a, b) in interpretation.decided() {
        clauses.push(vec![if b {
            mapping.true_lit(a)
        } else {
            mapping.false_lit(a)
        }]);
    }
}

fn encode_relative_bipolar<T>(
    adf: &AbstractDialecticalFramework<T>,
    mapping: &PropositionalMapping,
    vars: &mut VarAllocator,
    bipolarity: &RelativeBipolarity,
    clauses: &mut Vec<Clause>,
) -> Result<()>
where
    T: LabelType,
{
    let guard = bipolarity
        .assumptions()
        .decided()
        .map(|(a, b)| {
            if b {
                mapping.true_lit(a).negate()
            } else {
                mapping.false_lit(a).negate()
            }
        })
        .collect::<Vec<Literal>>();
    encode_bipolar(adf, mapping, vars, bipolarity.link_types(), &guard, clauses)
}

// An accepted argument must be accepted by the least favorable completion,
// and a rejected one must be rejected by the most favorable completion.
fn encode_bipolar<T>(
    adf: &AbstractDialecticalFramework<T>,
    mapping: &PropositionalMapping,
    vars: &mut VarAllocator,
    link_types: &LinkTypes,
    guard: &[Literal],
    clauses: &mut Vec<Clause>,
) -> Result<()>
where
    T: LabelType,
{
    for arg in adf.argument_set().iter() {
        let s = arg.id();
        if adf.links_to(s).next().is_none() || !link_types.all_bipolar(adf.links_to(s)) {
            continue;
        }
        let type_of = |r: usize| adf.link_between(r, s).map(|l| link_types.type_of(l));
        let p_min = compile_acceptance_condition(
            adf,
            vars,
            s,
            |r| match type_of(r)? {
                LinkType::Supporting | LinkType::Redundant => Some(mapping.true_lit(r)),
                LinkType::Attacking => Some(mapping.false_lit(r).negate()),
                LinkType::Unknown | LinkType::Dependent => None,
            },
            clauses,
        )?;
        let p_max = compile_acceptance_condition(
            adf,
            vars,
            s,
            |r| match type_of(r)? {
                LinkType::Supporting => Some(mapping.false_lit(r).negate()),
                LinkType::Attacking | LinkType::Redundant => Some(mapping.true_lit(r)),
                LinkType::Unknown | LinkType::Dependent => None,
            },
            clauses,
        )?;
        let mut accepted = guard.to_vec();
        accepted.push(mapping.true_lit(s).negate());
        accepted.push(p_min);
        clauses.push(accepted);
        let mut rejected = guard.to_vec();
        rejected.push(mapping.false_lit(s).negate());
        rejected.push(p_max.negate());
        clauses.push(rejected);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adf::{AcceptanceCondition, AdfBuilder, ArgumentSet, TruthValue::*},
        sat::{self, SolverState},
    };

    type Cond = AcceptanceCondition<&'static str>;

    fn self_support() -> AbstractDialecticalFramework<&'static str> {
        let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(&["a", "b"]));
        builder
            .set_acceptance_condition(&"a", Cond::argument("a"))
            .unwrap();
        builder
            .set_acceptance_condition(&"b", Cond::negation(Cond::argument("a")))
            .unwrap();
        builder.build()
    }

    fn enumerate<T: LabelType>(
        adf: &AbstractDialecticalFramework<T>,
        mapping: &PropositionalMapping,
        encodings: &[SatEncoding],
    ) -> Vec<Interpretation> {
        let mut state = SolverState::new(sat::default_solver());
        let mut vars = VarAllocator::new(mapping);
        state.reserve(mapping.n_base_vars());
        for e in encodings {
            state.add_all(e.encode(adf, mapping, &mut vars).unwrap()).unwrap();
        }
        let mut result = vec![];
        while state.satisfiable().unwrap() {
            let i = mapping.interpretation_from_witness(&state.witness().unwrap());
            state
                .add_all(SatEncoding::RefineUnequal(&i).encode(adf, mapping, &mut vars).unwrap())
                .unwrap();
            result.push(i);
        }
        result
    }

    fn contains(interpretations: &[Interpretation], values: Vec<TruthValue>) -> bool {
        interpretations.contains(&Interpretation::from_values(values))
    }

    #[test]
    fn test_links_allow_every_interpretation() {
        let adf = self_support();
        let mapping = PropositionalMapping::new(&adf);
        assert_eq!(9, enumerate(&adf, &mapping, &[SatEncoding::Links]).len());
    }

    #[test]
    fn test_conflict_free() {
        let adf = self_support();
        let mapping = PropositionalMapping::new(&adf);
        let cf = enumerate(&adf, &mapping, &[SatEncoding::ConflictFree]);
        assert_eq!(7, cf.len());
        assert!(!contains(&cf, vec![True, True]));
        assert!(!contains(&cf, vec![False, False]));
        assert!(contains(&cf, vec![Undecided, True]));
        assert!(contains(&cf, vec![Undecided, False]));
    }

    #[test]
    fn test_two_valued_model() {
        let adf = self_support();
        let mapping = PropositionalMapping::new(&adf);
        let models = enumerate(&adf, &mapping, &[SatEncoding::TwoValuedModel]);
        assert_eq!(2, models.len());
        assert!(contains(&models, vec![True, False]));
        assert!(contains(&models, vec![False, True]));
    }

    #[test]
    fn test_larger() {
        let adf = self_support();
        let mapping = PropositionalMapping::new(&adf);
        let i = Interpretation::from_values(vec![True, Undecided]);
        let larger = enumerate(&adf, &mapping, &[SatEncoding::Links, SatEncoding::Larger(&i)]);
        assert_eq!(2, larger.len());
        assert!(contains(&larger, vec![True, True]));
        assert!(contains(&larger, vec![True, False]));
    }

    #[test]
    fn test_larger_than_total_is_unsat() {
        let adf = self_support();
        let mapping = PropositionalMapping::new(&adf);
        let i = Interpretation::from_values(vec![True, False]);
        assert!(enumerate(&adf, &mapping, &[SatEncoding::Links, SatEncoding::Larger(&i)]).is_empty());
    }

    #[test]
    fn test_refine_larger() {
        let adf = self_support();
        let mapping = PropositionalMapping::new(&adf);
        let i = Interpretation::from_values(vec![True, Undecided]);
        let result = enumerate(
            &adf,
            &mapping,
            &[SatEncoding::Links, SatEncoding::RefineLarger(&i)],
        );
        assert_eq!(7, result.len());
        assert!(!contains(&result, vec![True, Undecided]));
        assert!(!contains(&result, vec![Undecided, Undecided]));
    }

    #[test]
    fn test_fix_partial() {
        let adf = self_support();
        let mapping = PropositionalMapping::new(&adf);
        let i = Interpretation::from_values(vec![Undecided, False]);
        let result = enumerate(&adf, &mapping, &[SatEncoding::Links, SatEncoding::FixPartial(&i)]);
        assert_eq!(3, result.len());
        assert!(result.iter().all(|r| r.value_of_id(1) == False));
    }

    #[test]
    fn test_refine_unequal_excludes_only_one() {
        let adf = self_support();
        let mapping = PropositionalMapping::new(&adf);
        let i = Interpretation::from_values(vec![Undecided, Undecided]);
        let result = enumerate(
            &adf,
            &mapping,
            &[SatEncoding::Links, SatEncoding::RefineUnequal(&i)],
        );
        assert_eq!(8, result.len());
        assert!(!contains(&result, vec![Undecided, Undecided]));
    }

    #[test]
    fn test_bipolar_keeps_admissible() {
        let adf = self_support();
        let mapping = PropositionalMapping::new(&adf);
        let mut link_types = LinkTypes::new_unknown(&adf);
        link_types.refine(adf.get_link(0), LinkType::Supporting);
        link_types.refine(adf.get_link(1), LinkType::Attacking);
        let result = enumerate(
            &adf,
            &mapping,
            &[SatEncoding::ConflictFree, SatEncoding::Bipolar(&link_types)],
        );
        // admissible interpretations of this framework
        assert_eq!(5, result.len());
        assert!(contains(&result, vec![Undecided, Undecided]));
        assert!(contains(&result, vec![True, Undecided]));
        assert!(contains(&result, vec![True, False]));
        assert!(contains(&result, vec![False, Undecided]));
        assert!(contains(&result, vec![False, True]));
    }

    #[test]
    fn test_bipolar_ignores_dependent_children() {
        let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(&["a", "b"]));
        builder
            .set_acceptance_condition(
                &"b",
                Cond::exclusive_disjunction(Cond::argument("a"), Cond::argument("b")),
            )
            .unwrap();
        let adf = builder.build();
        let mapping = PropositionalMapping::new(&adf);
        let mut link_types = LinkTypes::new_unknown(&adf);
        link_types.refine(adf.get_link(0), LinkType::Dependent);
        assert!(SatEncoding::Bipolar(&link_types)
            .encode(&adf, &mapping, &mut VarAllocator::new(&mapping))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_malformed_condition() {
        let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(&["a"]));
        builder
            .set_acceptance_condition(&"a", Cond::equivalence(vec![Cond::argument("a")]))
            .unwrap();
        let adf = builder.build();
        let mapping = PropositionalMapping::new(&adf);
        let mut vars = VarAllocator::new(&mapping);
        assert!(SatEncoding::Links.encode(&adf, &mapping, &mut vars).is_ok());
        match SatEncoding::ConflictFree.encode(&adf, &mapping, &mut vars) {
            Err(Error::MalformedAcceptanceCondition { argument, .. }) => assert_eq!("a", argument),
            _ => panic!(),
        }
    }
}
