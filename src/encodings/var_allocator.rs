use super::PropositionalMapping;
use crate::sat::{Literal, Variable};

/// Allocates the auxiliary variables of a single solving session.
///
/// The first variable handed out is the one following the variables of the [`PropositionalMapping`].
/// Each solver state gets its own allocator, so two sessions built from the same mapping use the same range of variables,
/// whatever the number of sessions built before them.
/// Clauses produced with an allocator must only be given to the state this allocator belongs to.
///
/// # Example
///
/// ```
/// # use crustadf::adf::{AdfBuilder, ArgumentSet};
/// # use crustadf::encodings::{PropositionalMapping, VarAllocator};
/// # use crustadf::sat::Literal;
/// let adf = AdfBuilder::new(ArgumentSet::new_with_labels(&["a", "b"])).build();
/// let mapping = PropositionalMapping::new(&adf);
/// let mut vars = VarAllocator::new(&mapping);
/// assert_eq!(Literal::from(5), vars.fresh_lit());
/// assert_eq!(Literal::from(5), VarAllocator::new(&mapping).fresh_lit());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarAllocator {
    next_free_var: usize,
}

impl VarAllocator {
    /// Builds an allocator starting right after the argument and link variables of the mapping.
    pub fn new(mapping: &PropositionalMapping) -> Self {
        Self {
            next_free_var: mapping.n_base_vars() + 1,
        }
    }

    /// Allocates a new auxiliary variable and returns its positive literal.
    pub fn fresh_lit(&mut self) -> Literal {
        let var = Variable::from(self.next_free_var);
        self.next_free_var += 1;
        var.positive()
    }

    /// Returns the highest variable allocated so far, base variables included.
    pub fn n_allocated_vars(&self) -> usize {
        self.next_free_var - 1
    }
}
