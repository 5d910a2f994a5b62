use crustadf::{
    adf::{
        AbstractDialecticalFramework, AcceptanceCondition, AdfBuilder, ArgumentSet,
        Interpretation, TruthValue,
    },
    encodings::{PropositionalMapping, SatEncoding},
    sat::{CadicalSolver, Clause, Literal, SatSolver, SatSolverFactoryFn, SolvingResult},
    solvers::{
        AdfReasoner, AdmissibleVerifier, BranchingPolicy, CandidateGenerator, CandidateKind,
        GroundedFixpoint, LinkTypeClassifier, Maximizer, ReasonerConfig, Semantics, Verifier,
    },
};
use paste::paste;
use std::{cell::Cell, rc::Rc};

type Cond = AcceptanceCondition<&'static str>;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn build(
    labels: &[&'static str],
    conditions: Vec<(&'static str, Cond)>,
) -> Result<AbstractDialecticalFramework<&'static str>, Box<dyn std::error::Error>> {
    let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(labels));
    for (l, c) in conditions {
        builder.set_acceptance_condition(&l, c)?;
    }
    Ok(builder.build())
}

#[test]
fn test_scenario_a() -> TestResult {
    let adf = build(
        &["a", "b"],
        vec![("a", Cond::Tautology), ("b", Cond::argument("a"))],
    )?;
    let mapping = PropositionalMapping::new(&adf);
    let grounded = GroundedFixpoint::new(&adf, &mapping).compute()?;
    assert_eq!(
        Interpretation::from_labels(
            &adf,
            &[("a", TruthValue::True), ("b", TruthValue::True)]
        )?,
        grounded
    );
    assert_eq!("t(a) t(b)", grounded.to_labeled_string(&adf));
    Ok(())
}

#[test]
fn test_scenario_b() -> TestResult {
    let adf = build(
        &["a", "b"],
        vec![
            ("a", Cond::negation(Cond::argument("b"))),
            ("b", Cond::negation(Cond::argument("a"))),
        ],
    )?;
    let mapping = PropositionalMapping::new(&adf);
    let grounded = GroundedFixpoint::new(&adf, &mapping).compute()?;
    assert_eq!(Interpretation::undecided(&adf), grounded);
    Ok(())
}

#[test]
fn test_scenario_c() -> TestResult {
    let adf = build(&["a"], vec![("a", Cond::argument("a"))])?;
    let mapping = PropositionalMapping::new(&adf);
    let mut generator = CandidateGenerator::new(CandidateKind::ConflictFree, &adf, &mapping)?;
    let mut found = vec![];
    while let Some(i) = generator.generate()? {
        assert!(!found.contains(&i));
        found.push(i);
    }
    let totals = found.iter().filter(|i| i.is_total()).collect::<Vec<_>>();
    assert_eq!(2, totals.len());
    for v in [TruthValue::True, TruthValue::False] {
        assert!(totals.contains(&&Interpretation::from_values(vec![v])));
    }
    for _ in 0..3 {
        assert!(generator.generate()?.is_none());
    }
    Ok(())
}

#[test]
fn test_scenario_d() -> TestResult {
    let adf = build(
        &["a", "b"],
        vec![
            ("a", Cond::negation(Cond::argument("b"))),
            ("b", Cond::negation(Cond::argument("a"))),
        ],
    )?;
    let mapping = PropositionalMapping::new(&adf);
    let maximal = Maximizer::new(&adf, &mapping).maximize(&Interpretation::undecided(&adf), None)?;
    assert!(maximal.is_total());
    assert_ne!(maximal.value_of_id(0), maximal.value_of_id(1));
    Ok(())
}

#[test]
fn test_grounded_is_deterministic() -> TestResult {
    let adf = build(
        &["a", "b", "c", "d"],
        vec![
            ("a", Cond::Tautology),
            (
                "b",
                Cond::implication(Cond::argument("a"), Cond::argument("c")),
            ),
            ("c", Cond::negation(Cond::argument("d"))),
            ("d", Cond::negation(Cond::argument("c"))),
        ],
    )?;
    let mapping = PropositionalMapping::new(&adf);
    let first = GroundedFixpoint::new(&adf, &mapping).compute()?;
    for _ in 0..5 {
        let other_mapping = PropositionalMapping::new(&adf);
        assert_eq!(first, GroundedFixpoint::new(&adf, &other_mapping).compute()?);
        assert_eq!(first, GroundedFixpoint::new(&adf, &mapping).compute()?);
    }
    Ok(())
}

#[test]
fn test_concurrent_sessions() -> TestResult {
    let adf = build(
        &["a", "b", "c"],
        vec![
            ("b", Cond::negation(Cond::argument("a"))),
            ("c", Cond::disjunction(vec![Cond::argument("b"), Cond::argument("c")])),
        ],
    )?;
    let mapping = PropositionalMapping::new(&adf);
    let expected = GroundedFixpoint::new(&adf, &mapping).compute()?;
    let (adf, mapping) = (&adf, &mapping);
    let results = std::thread::scope(|s| {
        let handles = (0..4)
            .map(|_| s.spawn(move || GroundedFixpoint::new(adf, mapping).compute()))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().expect("a session panicked"))
            .collect::<Vec<_>>()
    });
    for r in results {
        assert_eq!(expected, r?);
    }
    Ok(())
}

// A solver recording the highest variable it was given.
struct RecordingSolver {
    inner: CadicalSolver,
    max_var: Rc<Cell<usize>>,
}

impl SatSolver for RecordingSolver {
    fn add_clause(&mut self, cl: Clause) -> crustadf::Result<()> {
        let max = cl.iter().map(|l| usize::from(l.var())).max().unwrap_or_default();
        self.max_var.set(usize::max(self.max_var.get(), max));
        self.inner.add_clause(cl)
    }

    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> crustadf::Result<SolvingResult> {
        self.inner.solve_under_assumptions(assumptions)
    }

    fn n_vars(&self) -> usize {
        self.inner.n_vars()
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.max_var.set(usize::max(self.max_var.get(), new_max_id));
        self.inner.reserve(new_max_id)
    }
}

fn recording_factory(max_var: &Rc<Cell<usize>>) -> Box<SatSolverFactoryFn> {
    let max_var = Rc::clone(max_var);
    Box::new(move || -> Box<dyn SatSolver> {
        Box::new(RecordingSolver {
            inner: CadicalSolver::default(),
            max_var: Rc::clone(&max_var),
        })
    })
}

#[test]
fn test_sessions_keep_the_same_variables() -> TestResult {
    let adf = build(
        &["a", "b", "c"],
        vec![
            ("a", Cond::negation(Cond::argument("b"))),
            ("b", Cond::negation(Cond::argument("a"))),
            (
                "c",
                Cond::exclusive_disjunction(Cond::argument("a"), Cond::argument("c")),
            ),
        ],
    )?;
    let mapping = PropositionalMapping::new(&adf);
    let max_var = Rc::new(Cell::new(0));
    let fixpoint =
        GroundedFixpoint::new_with_sat_solver_factory(&adf, &mapping, recording_factory(&max_var));
    let link_types = LinkTypeClassifier::new_with_sat_solver_factory(&adf, &mapping, recording_factory(&max_var))
        .classify()?;
    let mut maximizer =
        Maximizer::new_with_sat_solver_factory(&adf, &mapping, recording_factory(&max_var));
    maximizer.add_processing_encoding(&SatEncoding::Bipolar(&link_types))?;
    let reasoner =
        AdfReasoner::new_with_sat_solver_factory(&adf, Semantics::Preferred, recording_factory(&max_var))
            .with_config(ReasonerConfig {
                k: 0,
                branching: BranchingPolicy::Fraction(1.),
            });
    let run = || -> Result<usize, Box<dyn std::error::Error>> {
        fixpoint.compute()?;
        maximizer.maximize(&Interpretation::undecided(&adf), None)?;
        assert_eq!(2, reasoner.compute_all()?.len());
        let mut verifier =
            AdmissibleVerifier::new_with_sat_solver_factory(&adf, &mapping, recording_factory(&max_var))?;
        verifier.verify(&Interpretation::undecided(&adf))?;
        Ok(max_var.get())
    };
    let first = run()?;
    assert!(first > mapping.n_base_vars());
    for _ in 0..20 {
        assert_eq!(first, run()?);
    }
    Ok(())
}

// Brute-force definitions of the semantics, based on the characteristic operator.
struct BruteForce<'a> {
    adf: &'a AbstractDialecticalFramework<&'static str>,
    n: usize,
}

impl<'a> BruteForce<'a> {
    fn new(adf: &'a AbstractDialecticalFramework<&'static str>) -> Self {
        Self {
            adf,
            n: adf.n_arguments(),
        }
    }

    fn all_interpretations(&self) -> Vec<Interpretation> {
        (0..3usize.pow(self.n as u32))
            .map(|mut code| {
                let mut values = Vec::with_capacity(self.n);
                for _ in 0..self.n {
                    values.push(match code % 3 {
                        0 => TruthValue::Undecided,
                        1 => TruthValue::True,
                        _ => TruthValue::False,
                    });
                    code /= 3;
                }
                Interpretation::from_values(values)
            })
            .collect()
    }

    fn completions(&self, i: &Interpretation) -> Vec<Vec<bool>> {
        (0..1usize << self.n)
            .map(|bits| (0..self.n).map(|j| bits & (1 << j) != 0).collect::<Vec<bool>>())
            .filter(|v| i.decided().all(|(a, b)| v[a] == b))
            .collect()
    }

    fn acceptance_values(&self, i: &Interpretation, arg: usize) -> Vec<bool> {
        self.completions(i)
            .iter()
            .map(|v| self.adf.acceptance_condition(arg).evaluate(&|r: &usize| v[*r]))
            .collect()
    }

    fn gamma(&self, i: &Interpretation) -> Interpretation {
        Interpretation::from_values(
            (0..self.n)
                .map(|s| {
                    let values = self.acceptance_values(i, s);
                    if values.iter().all(|b| *b) {
                        TruthValue::True
                    } else if values.iter().all(|b| !*b) {
                        TruthValue::False
                    } else {
                        TruthValue::Undecided
                    }
                })
                .collect(),
        )
    }

    fn is_conflict_free(&self, i: &Interpretation) -> bool {
        i.decided()
            .all(|(s, b)| self.acceptance_values(i, s).contains(&b))
    }

    // The grounded interpretation of the reduct, in which the arguments rejected by the model are fixed to false.
    fn is_stable(&self, model: &Interpretation) -> bool {
        let in_reduct = |s: usize| model.value_of_id(s) == TruthValue::True;
        let restrict = |i: &Interpretation| {
            Interpretation::from_values(
                (0..self.n)
                    .map(|s| if in_reduct(s) { i.value_of_id(s) } else { TruthValue::False })
                    .collect(),
            )
        };
        let mut current = restrict(&Interpretation::undecided(self.adf));
        loop {
            let next = restrict(&self.gamma(&current));
            if next == current {
                return (0..self.n).all(|s| !in_reduct(s) || current.value_of_id(s) == TruthValue::True);
            }
            current = next;
        }
    }

    fn maximal(&self, set: Vec<Interpretation>) -> Vec<Interpretation> {
        set.iter()
            .filter(|i| !set.iter().any(|j| j != *i && j.extends(i)))
            .cloned()
            .collect()
    }

    fn compute(&self, semantics: Semantics) -> Vec<Interpretation> {
        let all = self.all_interpretations();
        let admissible = || {
            all.iter()
                .filter(|i| self.gamma(i).extends(i))
                .cloned()
                .collect::<Vec<Interpretation>>()
        };
        match semantics {
            Semantics::ConflictFree => all.iter().filter(|i| self.is_conflict_free(i)).cloned().collect(),
            Semantics::Naive => self.maximal(self.compute(Semantics::ConflictFree)),
            Semantics::Admissible => admissible(),
            Semantics::Preferred => self.maximal(admissible()),
            Semantics::Complete => all.iter().filter(|i| self.gamma(i) == **i).cloned().collect(),
            Semantics::Model => all
                .iter()
                .filter(|i| i.is_total() && self.gamma(i) == **i)
                .cloned()
                .collect(),
            Semantics::Stable => self
                .compute(Semantics::Model)
                .into_iter()
                .filter(|i| self.is_stable(i))
                .collect(),
            Semantics::Ground => {
                let mut current = Interpretation::undecided(self.adf);
                loop {
                    let next = self.gamma(&current);
                    if next == current {
                        return vec![current];
                    }
                    current = next;
                }
            }
        }
    }
}

impl BruteForce<'_> {
    // Maximality is taken among the interpretations extending the prefix.
    fn compute_restricted(&self, semantics: Semantics, prefix: &Interpretation) -> Vec<Interpretation> {
        let extending = |set: Vec<Interpretation>| {
            set.into_iter()
                .filter(|i| i.extends(prefix))
                .collect::<Vec<Interpretation>>()
        };
        match semantics {
            Semantics::Naive => self.maximal(extending(self.compute(Semantics::ConflictFree))),
            Semantics::Preferred => self.maximal(extending(self.compute(Semantics::Admissible))),
            _ => extending(self.compute(semantics)),
        }
    }
}

struct FormulaGenerator {
    seed: u64,
}

impl FormulaGenerator {
    fn next(&mut self, bound: u64) -> u64 {
        self.seed = self
            .seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.seed >> 33) % bound
    }

    fn formula(&mut self, labels: &[&'static str], depth: usize) -> Cond {
        let choice = if depth == 0 { self.next(10) } else { self.next(18) };
        match choice {
            0 => Cond::Tautology,
            1 => Cond::Contradiction,
            2..=9 => Cond::argument(labels[self.next(labels.len() as u64) as usize]),
            10 | 11 => Cond::negation(self.formula(labels, depth - 1)),
            12 | 13 => Cond::conjunction(vec![
                self.formula(labels, depth - 1),
                self.formula(labels, depth - 1),
            ]),
            14 | 15 => Cond::disjunction(vec![
                self.formula(labels, depth - 1),
                self.formula(labels, depth - 1),
            ]),
            16 => Cond::implication(self.formula(labels, depth - 1), self.formula(labels, depth - 1)),
            _ => {
                if self.next(2) == 0 {
                    Cond::equivalence(vec![
                        self.formula(labels, depth - 1),
                        self.formula(labels, depth - 1),
                    ])
                } else {
                    Cond::exclusive_disjunction(
                        self.formula(labels, depth - 1),
                        self.formula(labels, depth - 1),
                    )
                }
            }
        }
    }

    fn prefix(&mut self, n: usize) -> Interpretation {
        Interpretation::from_values(
            (0..n)
                .map(|_| match self.next(4) {
                    0 => TruthValue::True,
                    1 => TruthValue::False,
                    _ => TruthValue::Undecided,
                })
                .collect(),
        )
    }

    fn adf(&mut self) -> Result<AbstractDialecticalFramework<&'static str>, Box<dyn std::error::Error>> {
        let labels = ["a", "b", "c"];
        let conditions = labels
            .iter()
            .map(|l| (*l, self.formula(&labels, 3)))
            .collect();
        build(&labels, conditions)
    }
}

fn assert_same_set(adf: &AbstractDialecticalFramework<&'static str>, expected: &[Interpretation], actual: &[Interpretation]) {
    let display = |set: &[Interpretation]| {
        set.iter()
            .map(|i| i.to_labeled_string(adf))
            .collect::<Vec<String>>()
            .join(" | ")
    };
    let message = format!("expected [{}], got [{}]", display(expected), display(actual));
    assert_eq!(expected.len(), actual.len(), "{}", message);
    for e in expected {
        assert!(actual.contains(e), "{}", message);
    }
}

macro_rules! test_against_brute_force {
    ($semantics:ident) => {
        paste! {
            #[test]
            fn [<test_ $semantics:snake _against_brute_force>]() -> TestResult {
                let mut generator = FormulaGenerator { seed: 17 };
                for _ in 0..25 {
                    let adf = generator.adf()?;
                    let expected = BruteForce::new(&adf).compute(Semantics::$semantics);
                    let actual = AdfReasoner::new(&adf, Semantics::$semantics).compute_all()?;
                    assert_same_set(&adf, &expected, &actual);
                    let branching = AdfReasoner::new(&adf, Semantics::$semantics)
                        .with_config(ReasonerConfig {
                            k: 0,
                            branching: BranchingPolicy::Fraction(1.),
                        })
                        .compute_all()?;
                    assert_same_set(&adf, &expected, &branching);
                }
                Ok(())
            }
        }
    };
}

test_against_brute_force!(ConflictFree);
test_against_brute_force!(Naive);
test_against_brute_force!(Admissible);
test_against_brute_force!(Preferred);
test_against_brute_force!(Complete);
test_against_brute_force!(Model);
test_against_brute_force!(Stable);
test_against_brute_force!(Ground);

macro_rules! test_restricted_against_brute_force {
    ($semantics:ident) => {
        paste! {
            #[test]
            fn [<test_restricted_ $semantics:snake _against_brute_force>]() -> TestResult {
                let mut generator = FormulaGenerator { seed: 29 };
                for _ in 0..25 {
                    let adf = generator.adf()?;
                    let prefix = generator.prefix(adf.n_arguments());
                    let expected = BruteForce::new(&adf).compute_restricted(Semantics::$semantics, &prefix);
                    let actual = AdfReasoner::new(&adf, Semantics::$semantics)
                        .restrict(&prefix)?
                        .compute_all()?;
                    assert_same_set(&adf, &expected, &actual);
                    let branching = AdfReasoner::new(&adf, Semantics::$semantics)
                        .with_config(ReasonerConfig {
                            k: 0,
                            branching: BranchingPolicy::Fraction(1.),
                        })
                        .restrict(&prefix)?
                        .compute_all()?;
                    assert_same_set(&adf, &expected, &branching);
                }
                Ok(())
            }
        }
    };
}

test_restricted_against_brute_force!(ConflictFree);
test_restricted_against_brute_force!(Naive);
test_restricted_against_brute_force!(Admissible);
test_restricted_against_brute_force!(Preferred);
test_restricted_against_brute_force!(Complete);
test_restricted_against_brute_force!(Model);
test_restricted_against_brute_force!(Stable);
test_restricted_against_brute_force!(Ground);
