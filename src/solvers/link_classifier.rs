use crate::{
    adf::{AbstractDialecticalFramework, Interpretation, LabelType, Link, LinkType, LinkTypes},
    encodings::{compile_acceptance_condition, PropositionalMapping, VarAllocator},
    error::{Error, Result},
    sat::{self, Clause, Literal, SatSolverFactoryFn, SolverState},
};
use log::{debug, warn};

/// Computes the types of the links of an ADF with a SAT solver.
///
/// A link from `r` to `s` is supporting if accepting `r` never turns the acceptance condition of `s` from true to false,
/// and attacking if accepting `r` never turns it from false to true.
/// Each of these checks is a SAT call on a formula made of two copies of the acceptance condition.
///
/// The classification can be made relative to a partial interpretation:
/// the decided arguments of this interpretation keep their values in all the checks,
/// and the links whose parents are decided are redundant.
///
/// # Example
///
/// ```
/// # use crustadf::adf::{AcceptanceCondition, AdfBuilder, ArgumentSet, LinkType};
/// # use crustadf::encodings::PropositionalMapping;
/// # use crustadf::solvers::LinkTypeClassifier;
/// let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(&["a", "b"]));
/// builder.set_acceptance_condition(&"b", AcceptanceCondition::negation(AcceptanceCondition::argument("a"))).unwrap();
/// let adf = builder.build();
/// let mapping = PropositionalMapping::new(&adf);
/// let link_types = LinkTypeClassifier::new(&adf, &mapping).classify().unwrap();
/// let link = adf.link_between(0, 1).unwrap();
/// assert_eq!(LinkType::Attacking, link_types.type_of(link));
/// ```
pub struct LinkTypeClassifier<'a, T>
where
    T: LabelType,
{
    adf: &'a AbstractDialecticalFramework<T>,
    mapping: &'a PropositionalMapping,
    solver_factory: Box<SatSolverFactoryFn>,
}

impl<'a, T> LinkTypeClassifier<'a, T>
where
    T: LabelType,
{
    /// Builds a new link type classifier.
    ///
    /// The underlying SAT solver is one returned by [default_solver](crate::sat::default_solver).
    pub fn new(adf: &'a AbstractDialecticalFramework<T>, mapping: &'a PropositionalMapping) -> Self {
        Self::new_with_sat_solver_factory(adf, mapping, Box::new(|| sat::default_solver()))
    }

    /// Builds a new link type classifier.
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

    /// Returns the types of all the links, in the absence of any assumption.
    pub fn classify(&self) -> Result<LinkTypes> {
        let mut link_types = LinkTypes::new_unknown(self.adf);
        self.classify_under(&Interpretation::undecided(self.adf), &mut link_types)?;
        Ok(link_types)
    }

    /// Sets the types of the links which are still unknown, relative to the given assumptions.
    ///
    /// Links coming to an argument whose acceptance condition is malformed are set to [`LinkType::Dependent`].
    /// Returns the number of links whose type was set.
    pub fn classify_under(&self, assumptions: &Interpretation, link_types: &mut LinkTypes) -> Result<usize> {
        let mut n_refined = 0;
        for child in 0..self.adf.n_arguments() {
            let unknown = self
                .adf
                .links_to(child)
                .filter(|l| link_types.type_of(l) == LinkType::Unknown)
                .copied()
                .collect::<Vec<Link>>();
            if unknown.is_empty() {
                continue;
            }
            let types = match self.classify_child(child, &unknown, assumptions) {
                Ok(types) => types,
                Err(e @ Error::MalformedAcceptanceCondition { .. }) => {
                    warn!("{}; its incoming links are considered dependent", e);
                    vec![LinkType::Dependent; unknown.len()]
                }
                Err(e) => return Err(e),
            };
            for (link, link_type) in unknown.iter().zip(types.into_iter()) {
                if link_types.refine(link, link_type) {
                    n_refined += 1;
                }
            }
        }
        debug!(
            "classified links under {} assumption(s): {} refined, {} dependent",
            assumptions.n_decided(),
            n_refined,
            link_types.n_dependent()
        );
        Ok(n_refined)
    }

    fn classify_child(
        &self,
        child: usize,
        links: &[Link],
        assumptions: &Interpretation,
    ) -> Result<Vec<LinkType>> {
        let mut state = SolverState::new((self.solver_factory)());
        let mut vars = VarAllocator::new(self.mapping);
        state.reserve(self.mapping.n_base_vars());
        for (a, b) in assumptions.decided() {
            let l = self.mapping.true_lit(a);
            state.add(vec![if b { l } else { l.negate() }])?;
        }
        let top = vars.fresh_lit();
        state.add(vec![top])?;
        let mut link_types = Vec::with_capacity(links.len());
        for link in links {
            let parent = link.from();
            if assumptions.value_of_id(parent).is_decided() {
                link_types.push(LinkType::Redundant);
                continue;
            }
            let mut clauses = vec![];
            let when_accepted =
                self.compile_with_parent(child, parent, top, &mut vars, &mut clauses)?;
            let when_rejected =
                self.compile_with_parent(child, parent, top.negate(), &mut vars, &mut clauses)?;
            state.add_all(clauses)?;
            state.assume(&[when_rejected, when_accepted.negate()])?;
            let supporting = !state.satisfiable()?;
            state.assume(&[when_accepted, when_rejected.negate()])?;
            let attacking = !state.satisfiable()?;
            link_types.push(LinkType::from_polarity(supporting, attacking));
        }
        Ok(link_types)
    }

    fn compile_with_parent(
        &self,
        child: usize,
        parent: usize,
        parent_lit: Literal,
        vars: &mut VarAllocator,
        clauses: &mut Vec<Clause>,
    ) -> Result<Literal> {
        compile_acceptance_condition(
            self.adf,
            vars,
            child,
            |r| {
                if r == parent {
                    Some(parent_lit)
                } else {
                    Some(self.mapping.true_lit(r))
                }
            },
            clauses,
        )
    }
}

/// The strategies used to bound the depth of the branching of a [`RelativeKBipolarClassifier`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BranchingPolicy {
    /// Branch on at most this number of arguments.
    Absolute(usize),
    /// Branch on at most this fraction of the arguments, rounded up.
    ///
    /// The fraction must be in `(0, 1]`.
    Fraction(f64),
}

impl BranchingPolicy {
    /// Returns the maximal branching depth for an ADF with the given number of arguments.
    ///
    /// A fraction outside of `(0, 1]` results in an [`Error::InvalidQuery`] error.
    pub fn bound(&self, n_arguments: usize) -> Result<usize> {
        match self {
            BranchingPolicy::Absolute(n) => Ok(usize::min(*n, n_arguments)),
            BranchingPolicy::Fraction(f) if *f > 0. && *f <= 1. => {
                let n = (f * n_arguments as f64).ceil() as usize;
                Ok(usize::min(n, n_arguments))
            }
            BranchingPolicy::Fraction(f) => Err(Error::InvalidQuery(format!(
                "branching fraction {} is not in (0, 1]",
                f
            ))),
        }
    }
}

impl Default for BranchingPolicy {
    fn default() -> Self {
        BranchingPolicy::Absolute(0)
    }
}

/// Link types that hold for the interpretations extending a partial interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeBipolarity {
    assumptions: Interpretation,
    link_types: LinkTypes,
}

impl RelativeBipolarity {
    /// Returns the partial interpretation the link types are relative to.
    pub fn assumptions(&self) -> &Interpretation {
        &self.assumptions
    }

    /// Returns the link types.
    pub fn link_types(&self) -> &LinkTypes {
        &self.link_types
    }

    /// Returns the number of links that are not bipolar under the assumptions.
    pub fn unresolved(&self) -> usize {
        self.link_types.n_unresolved()
    }
}

struct Branch {
    bipolarity: RelativeBipolarity,
    depth: usize,
}

/// Splits the interpretations of an ADF into subspaces in which the ADF is k-bipolar.
///
/// The classifier first computes the link types without assumptions.
/// While more than `k` links are not bipolar, it branches on the value (true or false) of an argument,
/// and recomputes the types of the non-bipolar links relative to the new assumptions.
/// Branching stops at the depth given by the [`BranchingPolicy`].
///
/// Arguments are branched on in decreasing order of their number of non-bipolar outgoing links,
/// unless an ordering is given by [`with_ordering`](Self::with_ordering).
///
/// The resulting classifications are meant to be used in a [`SatEncoding::RelativeKBipolar`](crate::encodings::SatEncoding::RelativeKBipolar) encoding.
pub struct RelativeKBipolarClassifier<'a, T>
where
    T: LabelType,
{
    adf: &'a AbstractDialecticalFramework<T>,
    link_classifier: LinkTypeClassifier<'a, T>,
    k: usize,
    policy: BranchingPolicy,
    ordering: Option<Vec<usize>>,
}

impl<'a, T> RelativeKBipolarClassifier<'a, T>
where
    T: LabelType,
{
    /// Builds a new classifier.
    ///
    /// The underlying SAT solver is one returned by [default_solver](crate::sat::default_solver).
    pub fn new(
        adf: &'a AbstractDialecticalFramework<T>,
        mapping: &'a PropositionalMapping,
        k: usize,
        policy: BranchingPolicy,
    ) -> Self {
        Self::new_with_sat_solver_factory(adf, mapping, k, policy, Box::new(|| sat::default_solver()))
    }

    /// Builds a new classifier.
    ///
    /// The SAT solver to use in given through the solver factory.
    pub fn new_with_sat_solver_factory(
        adf: &'a AbstractDialecticalFramework<T>,
        mapping: &'a PropositionalMapping,
        k: usize,
        policy: BranchingPolicy,
        solver_factory: Box<SatSolverFactoryFn>,
    ) -> Self {
        Self {
            adf,
            link_classifier: LinkTypeClassifier::new_with_sat_solver_factory(adf, mapping, solver_factory),
            k,
            policy,
            ordering: None,
        }
    }

    /// Sets the order in which arguments are branched on.
    ///
    /// Repeated ids are only kept at their first position.
    /// The branching depth is bounded by the number of distinct ids.
    /// An id which does not belong to the framework results in an [`Error::NoSuchArgument`] error.
    pub fn with_ordering(mut self, ordering: Vec<usize>) -> Result<Self> {
        let n_arguments = self.adf.n_arguments();
        if let Some(id) = ordering.iter().find(|id| **id >= n_arguments) {
            return Err(Error::NoSuchArgument(format!(
                "argument id {} in a framework of {} argument(s)",
                id, n_arguments
            )));
        }
        let mut seen = vec![false; n_arguments];
        let distinct = ordering
            .into_iter()
            .filter(|id| !std::mem::replace(&mut seen[*id], true))
            .collect();
        self.ordering = Some(distinct);
        Ok(self)
    }

    /// Computes the relative classifications.
    ///
    /// The assumptions of the classifications are pairwise incompatible.
    pub fn classify(&self) -> Result<Vec<RelativeBipolarity>> {
        let max_depth = self.policy.bound(self.adf.n_arguments())?;
        let root_types = self.link_classifier.classify()?;
        let ordering = match &self.ordering {
            Some(o) => o.clone(),
            None => self.default_ordering(&root_types),
        };
        let bound = usize::min(max_depth, ordering.len());
        let mut leaves = vec![];
        let mut worklist = vec![Branch {
            bipolarity: RelativeBipolarity {
                assumptions: Interpretation::undecided(self.adf),
                link_types: root_types,
            },
            depth: 0,
        }];
        while let Some(branch) = worklist.pop() {
            if branch.bipolarity.unresolved() <= self.k || branch.depth >= bound {
                debug!(
                    "relative classification with {} assumption(s) has {} non-bipolar link(s)",
                    branch.bipolarity.assumptions.n_decided(),
                    branch.bipolarity.unresolved()
                );
                leaves.push(branch.bipolarity);
                continue;
            }
            let arg = ordering[branch.depth];
            for value in [true, false] {
                let assumptions = branch.bipolarity.assumptions.with_value(arg, value.into());
                let mut link_types = branch.bipolarity.link_types.retain_bipolar();
                self.link_classifier.classify_under(&assumptions, &mut link_types)?;
                worklist.push(Branch {
                    bipolarity: RelativeBipolarity {
                        assumptions,
                        link_types,
                    },
                    depth: branch.depth + 1,
                });
            }
        }
        debug!("{} relative classification(s) computed", leaves.len());
        Ok(leaves)
    }

    fn default_ordering(&self, link_types: &LinkTypes) -> Vec<usize> {
        let n_dependent_out = |a: usize| {
            self.adf
                .links_from(a)
                .filter(|l| !link_types.type_of(l).is_bipolar())
                .count()
        };
        let mut ordering = (0..self.adf.n_arguments()).collect::<Vec<usize>>();
        ordering.sort_by_key(|a| (std::cmp::Reverse(n_dependent_out(*a)), *a));
        ordering
    }
}
