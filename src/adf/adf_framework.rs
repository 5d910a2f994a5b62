use super::{AcceptanceCondition, ArgumentSet, LabelType, Link};
use crate::error::{Error, FormulaError, Result};
use std::collections::HashMap;

/// An Abstract Dialectical Framework.
///
/// An ADF is made of a set of arguments and of an acceptance condition for each argument.
/// Acceptance conditions are stored over argument ids.
/// The links of the framework are derived from them: there is a link from `a` to `b` iff `a` occurs in the acceptance condition of `b`.
/// Cycles are allowed, including an argument occurring in its own acceptance condition.
///
/// ADFs are built using [`AdfBuilder`] objects and are immutable afterwards,
/// so they can be shared by reference between threads.
///
/// # Example
///
/// ```
/// # use crustadf::adf::{AcceptanceCondition, AdfBuilder, ArgumentSet};
/// let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(&["a", "b"]));
/// builder.set_acceptance_condition(&"b", AcceptanceCondition::argument("a")).unwrap();
/// let adf = builder.build();
/// assert_eq!(2, adf.n_arguments());
/// assert_eq!(1, adf.n_links());
/// assert_eq!("c(v)", adf.acceptance_condition(0).to_string());
/// ```
pub struct AbstractDialecticalFramework<T>
where
    T: LabelType,
{
    arguments: ArgumentSet<T>,
    acceptance_conditions: Vec<AcceptanceCondition<usize>>,
    links: Vec<Link>,
    links_to: Vec<Vec<usize>>,
    links_from: Vec<Vec<usize>>,
    link_ids: HashMap<(usize, usize), usize>,
}

impl<T> AbstractDialecticalFramework<T>
where
    T: LabelType,
{
    /// Returns the set of arguments of this framework.
    pub fn argument_set(&self) -> &ArgumentSet<T> {
        &self.arguments
    }

    /// Returns the number of arguments.
    pub fn n_arguments(&self) -> usize {
        self.arguments.len()
    }

    /// Returns the number of links.
    pub fn n_links(&self) -> usize {
        self.links.len()
    }

    /// Returns the acceptance condition of the argument with the given id.
    ///
    /// # Panics
    ///
    /// Panics if no argument has such id.
    pub fn acceptance_condition(&self, id: usize) -> &AcceptanceCondition<usize> {
        &self.acceptance_conditions[id]
    }

    /// Returns the acceptance condition of the argument with the given label.
    pub fn acceptance_condition_of(&self, label: &T) -> Result<&AcceptanceCondition<usize>> {
        let id = self.arguments.get_argument(label)?.id();
        Ok(&self.acceptance_conditions[id])
    }

    /// Iterates over the links, in increasing id order.
    ///
    /// Links are sorted by child, and then by order of first occurrence of the parent in the acceptance condition of the child.
    pub fn iter_links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.links.iter()
    }

    /// Returns the link with the given id.
    ///
    /// # Panics
    ///
    /// Panics if no link has such id.
    pub fn get_link(&self, id: usize) -> &Link {
        &self.links[id]
    }

    /// Returns the link between two arguments, if any.
    pub fn link_between(&self, from: usize, to: usize) -> Option<&Link> {
        self.link_ids.get(&(from, to)).map(|i| &self.links[*i])
    }

    /// Iterates over the links pointing to the argument with the given id.
    pub fn links_to(&self, id: usize) -> impl Iterator<Item = &Link> + '_ {
        self.links_to[id].iter().map(|i| &self.links[*i])
    }

    /// Iterates over the links starting at the argument with the given id.
    pub fn links_from(&self, id: usize) -> impl Iterator<Item = &Link> + '_ {
        self.links_from[id].iter().map(|i| &self.links[*i])
    }
}

/// A builder for [`AbstractDialecticalFramework`] objects.
///
/// Arguments whose acceptance condition is not set get the constant true as acceptance condition.
pub struct AdfBuilder<T>
where
    T: LabelType,
{
    arguments: ArgumentSet<T>,
    acceptance_conditions: Vec<Option<AcceptanceCondition<usize>>>,
}

impl<T> AdfBuilder<T>
where
    T: LabelType,
{
    /// Builds a new builder given the set of arguments of the framework.
    pub fn new(arguments: ArgumentSet<T>) -> Self {
        let n = arguments.len();
        Self {
            arguments,
            acceptance_conditions: vec![None; n],
        }
    }

    /// Sets the acceptance condition of an argument.
    ///
    /// The acceptance condition is given over argument labels.
    /// If some label does not match any argument, an error is returned and the builder is left unchanged.
    /// Setting the acceptance condition of an argument twice overrides the first one.
    ///
    /// # Example
    ///
    /// ```
    /// # use crustadf::adf::{AcceptanceCondition, AdfBuilder, ArgumentSet};
    /// let mut builder = AdfBuilder::new(ArgumentSet::new_with_labels(&["a"]));
    /// assert!(builder.set_acceptance_condition(&"a", AcceptanceCondition::argument("z")).is_err());
    /// assert!(builder.set_acceptance_condition(&"z", AcceptanceCondition::argument("a")).is_err());
    /// ```
    pub fn set_acceptance_condition(
        &mut self,
        label: &T,
        condition: AcceptanceCondition<T>,
    ) -> Result<()> {
        let id = self.arguments.get_argument(label)?.id();
        let arguments = &self.arguments;
        let mapped = condition
            .try_map_arguments(&mut |l: &T| {
                arguments
                    .get_argument(l)
                    .map(|a| a.id())
                    .map_err(|_| FormulaError::UnknownArgument(l.to_string()))
            })
            .map_err(|source| Error::MalformedAcceptanceCondition {
                argument: label.to_string(),
                source,
            })?;
        self.acceptance_conditions[id] = Some(mapped);
        Ok(())
    }

    /// Builds the framework, computing its links.
    pub fn build(self) -> AbstractDialecticalFramework<T> {
        let n = self.arguments.len();
        let acceptance_conditions: Vec<AcceptanceCondition<usize>> = self
            .acceptance_conditions
            .into_iter()
            .map(|c| c.unwrap_or(AcceptanceCondition::Tautology))
            .collect();
        let mut links = Vec::new();
        let mut links_to = vec![vec![]; n];
        let mut links_from = vec![vec![]; n];
        let mut link_ids = HashMap::new();
        for (to, cond) in acceptance_conditions.iter().enumerate() {
            for from in cond.arguments() {
                let link = Link::new(links.len(), *from, to);
                links_to[to].push(link.id());
                links_from[*from].push(link.id());
                link_ids.insert((*from, to), link.id());
                links.push(link);
            }
        }
        AbstractDialecticalFramework {
            arguments: self.arguments,
            acceptance_conditions,
            links,
            links_to,
            links_from,
            link_ids,
        }
    }
}
