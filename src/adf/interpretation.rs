use super::{AbstractDialecticalFramework, Argument, LabelType};
use std::fmt::Display;

/// The three truth values an interpretation may give to an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TruthValue {
    /// The argument is accepted.
    True,
    /// The argument is rejected.
    False,
    /// No decision is made for the argument.
    #[default]
    Undecided,
}

impl TruthValue {
    /// Returns `true` iff the value is not [`TruthValue::Undecided`].
    pub fn is_decided(&self) -> bool {
        *self != TruthValue::Undecided
    }

    /// Returns the Boolean value of a decided truth value, or `None` for [`TruthValue::Undecided`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TruthValue::True => Some(true),
            TruthValue::False => Some(false),
            TruthValue::Undecided => None,
        }
    }
}

impl From<bool> for TruthValue {
    fn from(b: bool) -> Self {
        if b {
            TruthValue::True
        } else {
            TruthValue::False
        }
    }
}

impl Display for TruthValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TruthValue::True => write!(f, "t"),
            TruthValue::False => write!(f, "f"),
            TruthValue::Undecided => write!(f, "u"),
        }
    }
}

/// A three-valued interpretation of the arguments of an ADF.
///
/// Interpretations are indexed by argument ids.
/// The arguments they do not mention are implicitly undecided, so that a partial interpretation
/// built during a fixpoint computation is directly usable.
///
/// Two interpretations are equal iff they give the same value to each argument.
///
/// # Example
///
/// ```
/// # use crustadf::adf::{Interpretation, TruthValue};
/// let partial = Interpretation::from_values(vec![TruthValue::True, TruthValue::Undecided]);
/// let total = Interpretation::from_values(vec![TruthValue::True, TruthValue::False]);
/// assert!(total.extends(&partial));
/// assert!(!partial.extends(&total));
/// assert!(total.is_total());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interpretation {
    values: Vec<TruthValue>,
}

impl Interpretation {
    /// Builds the interpretation in which each argument of the ADF is undecided.
    pub fn undecided<T>(adf: &AbstractDialecticalFramework<T>) -> Self
    where
        T: LabelType,
    {
        Self {
            values: vec![TruthValue::Undecided; adf.n_arguments()],
        }
    }

    /// Builds an interpretation from the values of the arguments, in increasing id order.
    pub fn from_values(values: Vec<TruthValue>) -> Self {
        Self { values }
    }

    /// Builds an interpretation from a list of argument labels and their truth values.
    ///
    /// Arguments that are not listed are undecided.
    pub fn from_labels<T>(
        adf: &AbstractDialecticalFramework<T>,
        values: &[(T, TruthValue)],
    ) -> crate::Result<Self>
    where
        T: LabelType,
    {
        let mut result = Self::undecided(adf);
        for (label, value) in values {
            let id = adf.argument_set().get_argument(label)?.id();
            result.values[id] = *value;
        }
        Ok(result)
    }

    /// Returns the value of the argument with the given id.
    pub fn value_of_id(&self, id: usize) -> TruthValue {
        self.values.get(id).copied().unwrap_or_default()
    }

    /// Returns the value of an argument.
    pub fn value_of<T>(&self, arg: &Argument<T>) -> TruthValue
    where
        T: LabelType,
    {
        self.value_of_id(arg.id())
    }

    /// Returns a copy of this interpretation in which the argument with the given id is set to a value.
    pub fn with_value(&self, id: usize, value: TruthValue) -> Self {
        let mut values = self.values.clone();
        if values.len() <= id {
            values.resize(id + 1, TruthValue::Undecided);
        }
        values[id] = value;
        Self { values }
    }

    /// Iterates over the ids of the arguments set to true.
    pub fn satisfied(&self) -> impl Iterator<Item = usize> + '_ {
        self.ids_with(TruthValue::True)
    }

    /// Iterates over the ids of the arguments set to false.
    pub fn unsatisfied(&self) -> impl Iterator<Item = usize> + '_ {
        self.ids_with(TruthValue::False)
    }

    /// Iterates over the ids of the undecided arguments among the `n_arguments` first ones.
    pub fn undecided_ids(&self, n_arguments: usize) -> impl Iterator<Item = usize> + '_ {
        (0..n_arguments).filter(|i| self.value_of_id(*i) == TruthValue::Undecided)
    }

    /// Iterates over the decided arguments, as couples of ids and Boolean values.
    pub fn decided(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_bool().map(|b| (i, b)))
    }

    fn ids_with(&self, value: TruthValue) -> impl Iterator<Item = usize> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(move |(_, v)| **v == value)
            .map(|(i, _)| i)
    }

    /// Returns the number of decided arguments.
    pub fn n_decided(&self) -> usize {
        self.values.iter().filter(|v| v.is_decided()).count()
    }

    /// Returns `true` iff no argument is undecided.
    pub fn is_total(&self) -> bool {
        self.values.iter().all(|v| v.is_decided())
    }

    /// Returns `true` iff this interpretation is greater or equal to the other one in the information order,
    /// that is if each argument decided by the other one gets the same value in this one.
    pub fn extends(&self, other: &Interpretation) -> bool {
        other
            .decided()
            .all(|(i, b)| self.value_of_id(i) == TruthValue::from(b))
    }

    /// Formats this interpretation using the labels of the arguments.
    ///
    /// ```
    /// # use crustadf::adf::{AdfBuilder, ArgumentSet, Interpretation, TruthValue};
    /// let adf = AdfBuilder::new(ArgumentSet::new_with_labels(&["a", "b"])).build();
    /// let i = Interpretation::from_values(vec![TruthValue::True, TruthValue::Undecided]);
    /// assert_eq!("t(a) u(b)", i.to_labeled_string(&adf));
    /// ```
    pub fn to_labeled_string<T>(&self, adf: &AbstractDialecticalFramework<T>) -> String
    where
        T: LabelType,
    {
        adf.argument_set()
            .iter()
            .map(|a| format!("{}({})", self.value_of(a), a))
            .collect::<Vec<String>>()
            .join(" ")
    }
}

impl PartialEq for Interpretation {
    fn eq(&self, other: &Self) -> bool {
        let n = usize::max(self.values.len(), other.values.len());
        (0..n).all(|i| self.value_of_id(i) == other.value_of_id(i))
    }
}

impl Eq for Interpretation {}
