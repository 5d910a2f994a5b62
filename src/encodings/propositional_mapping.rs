use crate::{
    adf::{AbstractDialecticalFramework, Interpretation, LabelType, Link, TruthValue},
    sat::{Assignment, Literal, Variable},
};

/// The mapping between the objects of an ADF and the variables of SAT solvers.
///
/// Each argument `s` is represented by two variables: `t_s` is true iff `s` is accepted, and `f_s` is true iff `s` is rejected.
/// An argument for which both variables are false is undecided.
/// The argument with id `i` gets the variables `2i+1` and `2i+2`.
/// Each link gets one variable after those of the arguments, representing the value the parent takes in the acceptance condition of the child.
///
/// The mapping is immutable and can be shared by sessions running on several threads.
/// The auxiliary variables needed by encodings are allocated per session by a [`VarAllocator`](super::VarAllocator).
///
/// # Example
///
/// ```
/// # use crustadf::adf::{AdfBuilder, ArgumentSet};
/// # use crustadf::encodings::PropositionalMapping;
/// # use crustadf::sat::Literal;
/// let adf = AdfBuilder::new(ArgumentSet::new_with_labels(&["a", "b"])).build();
/// let mapping = PropositionalMapping::new(&adf);
/// assert_eq!(Literal::from(3), mapping.true_lit(1));
/// assert_eq!(Literal::from(4), mapping.false_lit(1));
/// assert_eq!(4, mapping.n_base_vars());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropositionalMapping {
    n_arguments: usize,
    n_links: usize,
}

impl PropositionalMapping {
    /// Builds the mapping dedicated to an ADF.
    pub fn new<T>(adf: &AbstractDialecticalFramework<T>) -> Self
    where
        T: LabelType,
    {
        Self {
            n_arguments: adf.n_arguments(),
            n_links: adf.n_links(),
        }
    }

    /// Returns the variable that is true iff the argument with the given id is accepted.
    pub fn true_var(&self, arg_id: usize) -> Variable {
        Variable::from((arg_id << 1) + 1)
    }

    /// Returns the variable that is true iff the argument with the given id is rejected.
    pub fn false_var(&self, arg_id: usize) -> Variable {
        Variable::from((arg_id << 1) + 2)
    }

    /// Returns the positive literal of [`true_var`](Self::true_var).
    pub fn true_lit(&self, arg_id: usize) -> Literal {
        self.true_var(arg_id).positive()
    }

    /// Returns the positive literal of [`false_var`](Self::false_var).
    pub fn false_lit(&self, arg_id: usize) -> Literal {
        self.false_var(arg_id).positive()
    }

    /// Returns the variable associated to a link.
    pub fn link_var(&self, link: &Link) -> Variable {
        Variable::from((self.n_arguments << 1) + link.id() + 1)
    }

    /// Returns the positive literal of [`link_var`](Self::link_var).
    pub fn link_lit(&self, link: &Link) -> Literal {
        self.link_var(link).positive()
    }

    /// Returns the number of variables dedicated to arguments and links.
    pub fn n_base_vars(&self) -> usize {
        (self.n_arguments << 1) + self.n_links
    }

    /// Decodes the interpretation encoded by a SAT solver assignment.
    ///
    /// Variables that are unassigned in the witness are considered false.
    pub fn interpretation_from_witness(&self, witness: &Assignment) -> Interpretation {
        let values = (0..self.n_arguments)
            .map(|i| {
                if witness.satisfies(self.true_lit(i)) {
                    TruthValue::True
                } else if witness.satisfies(self.false_lit(i)) {
                    TruthValue::False
                } else {
                    TruthValue::Undecided
                }
            })
            .collect();
        Interpretation::from_values(values)
    }
}
