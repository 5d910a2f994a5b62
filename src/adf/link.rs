use super::{AbstractDialecticalFramework, LabelType};
use std::fmt::Display;

/// A link between two arguments, meaning the first one occurs in the acceptance condition of the second one.
///
/// Links are built by [`AbstractDialecticalFramework`] objects.
/// Their ids are consecutive integers starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    id: usize,
    from: usize,
    to: usize,
}

impl Link {
    pub(crate) fn new(id: usize, from: usize, to: usize) -> Self {
        Self { id, from, to }
    }

    /// Returns the id of this link.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the id of the parent argument.
    pub fn from(&self) -> usize {
        self.from
    }

    /// Returns the id of the child argument, the one whose acceptance condition contains the parent.
    pub fn to(&self) -> usize {
        self.to
    }
}

/// The influence a parent has on the acceptance condition of its child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkType {
    /// Not classified yet.
    #[default]
    Unknown,
    /// Accepting the parent never turns the acceptance condition from true to false.
    Supporting,
    /// Accepting the parent never turns the acceptance condition from false to true.
    Attacking,
    /// Both supporting and attacking: the acceptance condition does not depend on the parent.
    Redundant,
    /// Neither supporting nor attacking.
    Dependent,
}

impl LinkType {
    /// Builds a link type from the results of the support and attack checks.
    pub fn from_polarity(supporting: bool, attacking: bool) -> Self {
        match (supporting, attacking) {
            (true, true) => LinkType::Redundant,
            (true, false) => LinkType::Supporting,
            (false, true) => LinkType::Attacking,
            (false, false) => LinkType::Dependent,
        }
    }

    /// Returns `true` iff the type is known and is not [`LinkType::Dependent`].
    pub fn is_bipolar(&self) -> bool {
        matches!(
            self,
            LinkType::Supporting | LinkType::Attacking | LinkType::Redundant
        )
    }
}

impl Display for LinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LinkType::Unknown => "unknown",
            LinkType::Supporting => "supporting",
            LinkType::Attacking => "attacking",
            LinkType::Redundant => "redundant",
            LinkType::Dependent => "dependent",
        };
        write!(f, "{}", s)
    }
}

/// The types of the links of an ADF.
///
/// The types start as [`LinkType::Unknown`] and can only be refined to a concrete type once.
/// A refined type is never regressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTypes {
    types: Vec<LinkType>,
}

impl LinkTypes {
    /// Builds a link type set in which each link of the ADF is of unknown type.
    pub fn new_unknown<T>(adf: &AbstractDialecticalFramework<T>) -> Self
    where
        T: LabelType,
    {
        Self {
            types: vec![LinkType::Unknown; adf.n_links()],
        }
    }

    /// Returns the type of a link.
    pub fn type_of(&self, link: &Link) -> LinkType {
        self.types[link.id()]
    }

    /// Sets the type of a link if it is still unknown.
    ///
    /// Returns `true` iff the type was updated.
    /// Refining to [`LinkType::Unknown`] or refining an already known type has no effect.
    pub fn refine(&mut self, link: &Link, link_type: LinkType) -> bool {
        let current = &mut self.types[link.id()];
        if *current == LinkType::Unknown && link_type != LinkType::Unknown {
            *current = link_type;
            true
        } else {
            false
        }
    }

    /// Returns the number of links which are not known to be bipolar.
    pub fn n_unresolved(&self) -> usize {
        self.types.iter().filter(|t| !t.is_bipolar()).count()
    }

    /// Returns the number of links known as non-bipolar.
    ///
    /// An ADF is k-bipolar if at most k of its links are non-bipolar.
    pub fn n_dependent(&self) -> usize {
        self.types
            .iter()
            .filter(|t| **t == LinkType::Dependent)
            .count()
    }

    /// Returns `true` iff the types of all the links are known and bipolar.
    pub fn all_bipolar<'a>(&self, mut links: impl Iterator<Item = &'a Link>) -> bool {
        links.all(|l| self.type_of(l).is_bipolar())
    }

    /// Returns a copy of these types in which the links that are not bipolar are set back to [`LinkType::Unknown`].
    pub fn retain_bipolar(&self) -> Self {
        Self {
            types: self
                .types
                .iter()
                .map(|t| if t.is_bipolar() { *t } else { LinkType::Unknown })
                .collect(),
        }
    }
}
