//! Discount composition
//!
//! A discount node is combined with its nested nodes twice: once to decide
//! whether the group is active ([`LogicComposition`]) and once to turn the
//! group's percentages into a single price multiplier ([`NumericalComposition`]).

use serde::Deserialize;

/// Boolean gate across a node and its nested nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicComposition {
    /// Only the node's own condition gates activation.
    #[default]
    Undefined,

    /// Exactly one member's condition holds.
    Xor,

    /// Every member's condition holds.
    And,

    /// At least one member's condition holds.
    Or,
}

impl LogicComposition {
    /// Combine the node's own condition result with its nested nodes' results.
    pub fn combine(self, own: bool, nested: impl IntoIterator<Item = bool>) -> bool {
        let mut members = std::iter::once(own).chain(nested);

        match self {
            LogicComposition::Undefined => own,
            LogicComposition::Xor => members.filter(|holds| *holds).count() == 1,
            LogicComposition::And => members.all(|holds| holds),
            LogicComposition::Or => members.any(|holds| holds),
        }
    }
}

/// How the percentages of a node and its nested nodes become one multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericalComposition {
    /// Percentages are summed, capped at 100%.
    #[default]
    Undefined,

    /// Only the largest percentage counts.
    Maximum,

    /// Percentages compound.
    Multiplication,
}

impl NumericalComposition {
    /// Compute the multiplier for a group of percentages.
    ///
    /// The result is never negative for percentages in `[0, 1]`; the additive
    /// and maximum forms clamp at zero for any input.
    pub fn multiplier(self, percentages: impl IntoIterator<Item = f64>) -> f64 {
        match self {
            NumericalComposition::Undefined => {
                let total: f64 = percentages.into_iter().sum();

                1.0 - total.min(1.0)
            }
            NumericalComposition::Maximum => {
                let max = percentages.into_iter().fold(0.0_f64, f64::max);

                (1.0 - max).max(0.0)
            }
            NumericalComposition::Multiplication => percentages
                .into_iter()
                .map(|percent| 1.0 - percent)
                .product(),
        }
    }
}
