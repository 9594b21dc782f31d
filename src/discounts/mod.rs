//! Discounts
//!
//! A [`DiscountNode`] is one discount rule. Nodes reference other nodes by id
//! (their nested nodes); when a node fires, its own percentage and those of its
//! nested nodes are combined into one multiplier, which is applied to every
//! basket product in the node's [`Scope`].

use smallvec::SmallVec;
use tracing::debug;

use crate::{
    basket::Basket,
    ids::{DiscountId, StoreId},
    pricing::run::PricingRun,
    products::Product,
};

pub mod composition;
pub mod condition;

pub use composition::{LogicComposition, NumericalComposition};
pub use condition::Condition;

/// Which products a node's multiplier applies to.
///
/// A blank target name matches every product.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    /// No level configured; applies store-wide.
    #[default]
    Undefined,

    /// Every product in the store.
    Store,

    /// Products with this name.
    Product(String),

    /// Products in this category.
    Category(String),
}

impl Scope {
    /// Whether the product falls within this scope.
    pub fn contains(&self, product: &Product) -> bool {
        match self {
            Scope::Undefined | Scope::Store => true,
            Scope::Product(name) => name.trim().is_empty() || product.name == *name,
            Scope::Category(category) => {
                category.trim().is_empty() || product.category == *category
            }
        }
    }
}

/// Discount rule
#[derive(Debug, Clone)]
pub struct DiscountNode {
    /// Node id
    pub id: DiscountId,

    /// Owning store
    pub store_id: StoreId,

    /// Products the multiplier applies to
    pub scope: Scope,

    /// Activation gate across this node and its nested nodes
    pub logic: LogicComposition,

    /// Percentage combination across this node and its nested nodes
    pub numerical: NumericalComposition,

    /// Nested node ids, in order
    pub nested_ids: SmallVec<[DiscountId; 4]>,

    /// This node's own percentage, as a fraction in `[0, 1]`
    pub percent: f64,

    /// Activation condition
    pub condition: Condition,
}

impl DiscountNode {
    /// Create an unconditional store-wide node with the given percentage.
    pub fn new(id: impl Into<DiscountId>, store_id: impl Into<StoreId>, percent: f64) -> Self {
        Self {
            id: id.into(),
            store_id: store_id.into(),
            scope: Scope::default(),
            logic: LogicComposition::default(),
            numerical: NumericalComposition::default(),
            nested_ids: SmallVec::new(),
            percent,
            condition: Condition::default(),
        }
    }

    /// Set the scope.
    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the logic composition.
    #[must_use]
    pub fn with_logic(mut self, logic: LogicComposition) -> Self {
        self.logic = logic;
        self
    }

    /// Set the numerical composition.
    #[must_use]
    pub fn with_numerical(mut self, numerical: NumericalComposition) -> Self {
        self.numerical = numerical;
        self
    }

    /// Set the condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Set the nested node ids.
    #[must_use]
    pub fn with_nested<I, D>(mut self, nested: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DiscountId>,
    {
        self.nested_ids = nested.into_iter().map(Into::into).collect();
        self
    }

    /// Whether this node's own condition holds.
    pub fn condition_holds(&self, original_price: f64, basket: &Basket) -> bool {
        self.condition.evaluate(original_price, basket)
    }

    /// Whether this node, gated together with its nested nodes, is active.
    pub fn is_active(&self, original_price: f64, basket: &Basket, nested: &[&DiscountNode]) -> bool {
        self.logic.combine(
            self.condition_holds(original_price, basket),
            nested
                .iter()
                .map(|node| node.condition_holds(original_price, basket)),
        )
    }

    /// Multiplier produced by this node's and its nested nodes' percentages.
    pub fn multiplier(&self, nested: &[&DiscountNode]) -> f64 {
        self.numerical.multiplier(
            std::iter::once(self.percent).chain(nested.iter().map(|node| node.percent)),
        )
    }

    /// Apply this node to the run.
    ///
    /// Does nothing if the node is already spent in this run or is not active.
    /// Returns whether the node fired.
    pub fn apply_discount(&self, run: &mut PricingRun<'_>, nested: &[&DiscountNode]) -> bool {
        if run.is_spent(&self.id) {
            debug!(discount = %self.id, "discount already spent; skipping");
            return false;
        }

        if !self.is_active(run.original_price(), run.basket(), nested) {
            debug!(discount = %self.id, "discount inactive");
            return false;
        }

        self.apply_new_multiplier(run, nested);

        true
    }

    /// Scale every in-scope product by this node's multiplier, then mark the
    /// node and all of its nested nodes as spent.
    ///
    /// Nested nodes are spent whether or not their own conditions held.
    pub fn apply_new_multiplier(&self, run: &mut PricingRun<'_>, nested: &[&DiscountNode]) {
        let multiplier = self.multiplier(nested);

        debug!(
            discount = %self.id,
            multiplier,
            nested = nested.len(),
            "applying discount"
        );

        run.scale_where(multiplier, |product| self.scope.contains(product));
        run.mark_spent(&self.id);

        for node in nested {
            run.mark_spent(&node.id);
        }

        run.record_fired(&self.id);
    }
}
