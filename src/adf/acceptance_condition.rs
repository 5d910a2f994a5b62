use std::fmt::Display;

/// A propositional formula over arguments, used as the acceptance condition of an argument.
///
/// The type parameter is the way arguments are referenced inside the formula.
/// User code builds conditions over argument labels, while an [`AbstractDialecticalFramework`](super::AbstractDialecticalFramework)
/// stores them over argument ids.
///
/// Empty conjunctions are true, and empty disjunctions are false.
/// Equivalences require at least two operands; this is checked when the formula is compiled into clauses.
///
/// # Example
///
/// ```
/// # use crustadf::adf::AcceptanceCondition;
/// // a and not b
/// let cond = AcceptanceCondition::conjunction(vec![
///     AcceptanceCondition::argument("a"),
///     AcceptanceCondition::negation(AcceptanceCondition::argument("b")),
/// ]);
/// assert_eq!("and(a,neg(b))", cond.to_string());
/// assert!(cond.evaluate(&|a| *a == "a"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AcceptanceCondition<A> {
    /// The constant true.
    Tautology,
    /// The constant false.
    Contradiction,
    /// The truth value of an argument.
    Argument(A),
    /// The negation of a formula.
    Negation(Box<AcceptanceCondition<A>>),
    /// The conjunction of formulas.
    Conjunction(Vec<AcceptanceCondition<A>>),
    /// The disjunction of formulas.
    Disjunction(Vec<AcceptanceCondition<A>>),
    /// An implication, from its premise to its conclusion.
    Implication(Box<AcceptanceCondition<A>>, Box<AcceptanceCondition<A>>),
    /// The fact that all the formulas share the same truth value.
    Equivalence(Vec<AcceptanceCondition<A>>),
    /// The exclusive disjunction of two formulas.
    ExclusiveDisjunction(Box<AcceptanceCondition<A>>, Box<AcceptanceCondition<A>>),
}

impl<A> AcceptanceCondition<A> {
    /// Builds the formula made of a single argument.
    pub fn argument(a: A) -> Self {
        AcceptanceCondition::Argument(a)
    }

    /// Builds the negation of a formula.
    pub fn negation(child: Self) -> Self {
        AcceptanceCondition::Negation(Box::new(child))
    }

    /// Builds the conjunction of formulas.
    pub fn conjunction(children: Vec<Self>) -> Self {
        AcceptanceCondition::Conjunction(children)
    }

    /// Builds the disjunction of formulas.
    pub fn disjunction(children: Vec<Self>) -> Self {
        AcceptanceCondition::Disjunction(children)
    }

    /// Builds an implication.
    pub fn implication(premise: Self, conclusion: Self) -> Self {
        AcceptanceCondition::Implication(Box::new(premise), Box::new(conclusion))
    }

    /// Builds an equivalence.
    pub fn equivalence(children: Vec<Self>) -> Self {
        AcceptanceCondition::Equivalence(children)
    }

    /// Builds an exclusive disjunction.
    pub fn exclusive_disjunction(left: Self, right: Self) -> Self {
        AcceptanceCondition::ExclusiveDisjunction(Box::new(left), Box::new(right))
    }

    /// Returns the arguments occurring in this formula, in order of first occurrence and without repetition.
    pub fn arguments(&self) -> Vec<&A>
    where
        A: PartialEq,
    {
        let mut result = Vec::new();
        self.collect_arguments(&mut result);
        result
    }

    fn collect_arguments<'a>(&'a self, result: &mut Vec<&'a A>)
    where
        A: PartialEq,
    {
        match self {
            AcceptanceCondition::Tautology | AcceptanceCondition::Contradiction => {}
            AcceptanceCondition::Argument(a) => {
                if !result.contains(&a) {
                    result.push(a)
                }
            }
            AcceptanceCondition::Negation(c) => c.collect_arguments(result),
            AcceptanceCondition::Conjunction(cs)
            | AcceptanceCondition::Disjunction(cs)
            | AcceptanceCondition::Equivalence(cs) => {
                cs.iter().for_each(|c| c.collect_arguments(result))
            }
            AcceptanceCondition::Implication(l, r)
            | AcceptanceCondition::ExclusiveDisjunction(l, r) => {
                l.collect_arguments(result);
                r.collect_arguments(result);
            }
        }
    }

    /// Evaluates this formula given the truth values of the arguments.
    ///
    /// An equivalence with less than two operands is considered true.
    pub fn evaluate(&self, value_of: &dyn Fn(&A) -> bool) -> bool {
        match self {
            AcceptanceCondition::Tautology => true,
            AcceptanceCondition::Contradiction => false,
            AcceptanceCondition::Argument(a) => value_of(a),
            AcceptanceCondition::Negation(c) => !c.evaluate(value_of),
            AcceptanceCondition::Conjunction(cs) => cs.iter().all(|c| c.evaluate(value_of)),
            AcceptanceCondition::Disjunction(cs) => cs.iter().any(|c| c.evaluate(value_of)),
            AcceptanceCondition::Implication(l, r) => {
                !l.evaluate(value_of) || r.evaluate(value_of)
            }
            AcceptanceCondition::Equivalence(cs) => {
                let mut values = cs.iter().map(|c| c.evaluate(value_of));
                match values.next() {
                    Some(first) => values.all(|v| v == first),
                    None => true,
                }
            }
            AcceptanceCondition::ExclusiveDisjunction(l, r) => {
                l.evaluate(value_of) != r.evaluate(value_of)
            }
        }
    }

    /// Translates the argument references of this formula.
    ///
    /// The first error returned by the translation function stops the process and is returned.
    pub fn try_map_arguments<B, E, F>(&self, f: &mut F) -> Result<AcceptanceCondition<B>, E>
    where
        F: FnMut(&A) -> Result<B, E>,
    {
        Ok(match self {
            AcceptanceCondition::Tautology => AcceptanceCondition::Tautology,
            AcceptanceCondition::Contradiction => AcceptanceCondition::Contradiction,
            AcceptanceCondition::Argument(a) => AcceptanceCondition::Argument(f(a)?),
            AcceptanceCondition::Negation(c) => {
                AcceptanceCondition::Negation(Box::new(c.try_map_arguments(f)?))
            }
            AcceptanceCondition::Conjunction(cs) => AcceptanceCondition::Conjunction(Self::try_map_all(cs, f)?),
            AcceptanceCondition::Disjunction(cs) => AcceptanceCondition::Disjunction(Self::try_map_all(cs, f)?),
            AcceptanceCondition::Equivalence(cs) => AcceptanceCondition::Equivalence(Self::try_map_all(cs, f)?),
            AcceptanceCondition::Implication(l, r) => AcceptanceCondition::Implication(
                Box::new(l.try_map_arguments(f)?),
                Box::new(r.try_map_arguments(f)?),
            ),
            AcceptanceCondition::ExclusiveDisjunction(l, r) => {
                AcceptanceCondition::ExclusiveDisjunction(
                    Box::new(l.try_map_arguments(f)?),
                    Box::new(r.try_map_arguments(f)?),
                )
            }
        })
    }

    /// Replaces each argument occurrence by the formula given by the substitution function.
    ///
    /// # Example
    ///
    /// ```
    /// # use crustadf::adf::AcceptanceCondition;
    /// let cond = AcceptanceCondition::disjunction(vec![
    ///     AcceptanceCondition::argument("a"),
    ///     AcceptanceCondition::argument("b"),
    /// ]);
    /// let reduced = cond.substitute_arguments(&mut |a| match *a {
    ///     "a" => AcceptanceCondition::Contradiction,
    ///     _ => AcceptanceCondition::argument(*a),
    /// });
    /// assert_eq!("or(c(f),b)", reduced.to_string());
    /// ```
    pub fn substitute_arguments<B, F>(&self, f: &mut F) -> AcceptanceCondition<B>
    where
        F: FnMut(&A) -> AcceptanceCondition<B>,
    {
        let all = |cs: &[AcceptanceCondition<A>], f: &mut F| -> Vec<AcceptanceCondition<B>> {
            cs.iter().map(|c| c.substitute_arguments(f)).collect()
        };
        match self {
            AcceptanceCondition::Tautology => AcceptanceCondition::Tautology,
            AcceptanceCondition::Contradiction => AcceptanceCondition::Contradiction,
            AcceptanceCondition::Argument(a) => f(a),
            AcceptanceCondition::Negation(c) => {
                AcceptanceCondition::Negation(Box::new(c.substitute_arguments(f)))
            }
            AcceptanceCondition::Conjunction(cs) => AcceptanceCondition::Conjunction(all(cs, f)),
            AcceptanceCondition::Disjunction(cs) => AcceptanceCondition::Disjunction(all(cs, f)),
            AcceptanceCondition::Equivalence(cs) => AcceptanceCondition::Equivalence(all(cs, f)),
            AcceptanceCondition::Implication(l, r) => AcceptanceCondition::Implication(
                Box::new(l.substitute_arguments(f)),
                Box::new(r.substitute_arguments(f)),
            ),
            AcceptanceCondition::ExclusiveDisjunction(l, r) => {
                AcceptanceCondition::ExclusiveDisjunction(
                    Box::new(l.substitute_arguments(f)),
                    Box::new(r.substitute_arguments(f)),
                )
            }
        }
    }

    fn try_map_all<B, E, F>(
        children: &[AcceptanceCondition<A>],
        f: &mut F,
    ) -> Result<Vec<AcceptanceCondition<B>>, E>
    where
        F: FnMut(&A) -> Result<B, E>,
    {
        children.iter().map(|c| c.try_map_arguments(f)).collect()
    }
}

fn write_list<A: Display>(
    f: &mut std::fmt::Formatter<'_>,
    name: &str,
    children: &[&AcceptanceCondition<A>],
) -> std::fmt::Result {
    write!(f, "{}(", name)?;
    for (i, c) in children.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, ")")
}

// Prefix notation, as in the common ADF input formats.
impl<A> Display for AcceptanceCondition<A>
where
    A: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcceptanceCondition::Tautology => write!(f, "c(v)"),
            AcceptanceCondition::Contradiction => write!(f, "c(f)"),
            AcceptanceCondition::Argument(a) => write!(f, "{}", a),
            AcceptanceCondition::Negation(c) => write!(f, "neg({})", c),
            AcceptanceCondition::Conjunction(cs) => {
                write_list(f, "and", &cs.iter().collect::<Vec<_>>())
            }
            AcceptanceCondition::Disjunction(cs) => {
                write_list(f, "or", &cs.iter().collect::<Vec<_>>())
            }
            AcceptanceCondition::Equivalence(cs) => {
                write_list(f, "iff", &cs.iter().collect::<Vec<_>>())
            }
            AcceptanceCondition::Implication(l, r) => write_list(f, "imp", &[l.as_ref(), r.as_ref()]),
            AcceptanceCondition::ExclusiveDisjunction(l, r) => write_list(f, "xor", &[l.as_ref(), r.as_ref()]),
        }
    }
}
