//! Pricing run state
//!
//! Everything that changes while a store's discount policy is walked over a
//! basket lives here, owned by the caller, rather than on the discount nodes.
//! Starting a new [`PricingRun`] is the per-run reset: no node is spent and
//! every product's multiplier is `1.0`.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::{
    basket::Basket,
    ids::{DiscountId, ProductId},
    products::Product,
};

/// Per-product running discount factor.
#[derive(Debug, Clone, Default)]
pub struct MultiplierMap {
    multipliers: FxHashMap<ProductId, f64>,
}

impl MultiplierMap {
    /// Start every product in the basket at `1.0`.
    pub fn for_basket(basket: &Basket) -> Self {
        let multipliers = basket
            .products()
            .map(|product| (product.id.clone(), 1.0))
            .collect();

        Self { multipliers }
    }

    /// Current multiplier for a product, if it is in the map.
    pub fn get(&self, product: &ProductId) -> Option<f64> {
        self.multipliers.get(product).copied()
    }

    /// Multiply a product's current multiplier by `factor`.
    ///
    /// Products that are not in the map are ignored.
    pub fn scale(&mut self, product: &ProductId, factor: f64) {
        if let Some(multiplier) = self.multipliers.get_mut(product) {
            *multiplier *= factor;
        }
    }

    /// Number of products in the map.
    pub fn len(&self) -> usize {
        self.multipliers.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }
}

/// Ids of the discount nodes that have already applied their effect.
#[derive(Debug, Clone, Default)]
pub struct SpentSet {
    spent: FxHashSet<DiscountId>,
}

impl SpentSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a node has been spent.
    pub fn contains(&self, id: &DiscountId) -> bool {
        self.spent.contains(id)
    }

    /// Mark a node as spent.
    pub fn insert(&mut self, id: DiscountId) {
        self.spent.insert(id);
    }

    /// Number of spent nodes.
    pub fn len(&self) -> usize {
        self.spent.len()
    }

    /// Check if no node is spent.
    pub fn is_empty(&self) -> bool {
        self.spent.is_empty()
    }
}

/// One evaluation of a discount policy over a basket.
#[derive(Debug)]
pub struct PricingRun<'a> {
    basket: &'a Basket,
    original_price: f64,
    multipliers: MultiplierMap,
    spent: SpentSet,
    fired: SmallVec<[DiscountId; 8]>,
}

impl<'a> PricingRun<'a> {
    /// Start a run over a basket.
    pub fn new(basket: &'a Basket) -> Self {
        Self {
            basket,
            original_price: basket.original_price(),
            multipliers: MultiplierMap::for_basket(basket),
            spent: SpentSet::new(),
            fired: SmallVec::new(),
        }
    }

    /// The basket being priced
    pub fn basket(&self) -> &'a Basket {
        self.basket
    }

    /// Basket total before any discount, computed once at the start of the run.
    pub fn original_price(&self) -> f64 {
        self.original_price
    }

    /// Current multipliers
    pub fn multipliers(&self) -> &MultiplierMap {
        &self.multipliers
    }

    /// Nodes spent so far
    pub fn spent(&self) -> &SpentSet {
        &self.spent
    }

    /// Whether a node has been spent in this run.
    pub fn is_spent(&self, id: &DiscountId) -> bool {
        self.spent.contains(id)
    }

    /// Ids of the nodes that fired, in firing order.
    pub fn fired(&self) -> &[DiscountId] {
        &self.fired
    }

    /// Scale the multiplier of every basket product matching `in_scope`.
    pub(crate) fn scale_where(&mut self, factor: f64, in_scope: impl Fn(&Product) -> bool) {
        for product in self.basket.products() {
            if in_scope(product) {
                self.multipliers.scale(&product.id, factor);
            }
        }
    }

    pub(crate) fn mark_spent(&mut self, id: &DiscountId) {
        self.spent.insert(id.clone());
    }

    pub(crate) fn record_fired(&mut self, id: &DiscountId) {
        self.fired.push(id.clone());
    }

    /// Sum of unit price times multiplier times quantity over the basket.
    pub fn final_price(&self) -> f64 {
        self.basket
            .iter()
            .map(|line| {
                let multiplier = self.multipliers.get(&line.product().id).unwrap_or(1.0);

                line.nominal_price() * multiplier
            })
            .sum()
    }

    /// Consume the run, returning the multipliers and fired ids.
    pub(crate) fn into_parts(self) -> (MultiplierMap, SmallVec<[DiscountId; 8]>) {
        (self.multipliers, self.fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basket() -> Basket {
        Basket::with_lines([
            (Product::new("apple", "Apple", "Fruit", 15.0), 2),
            (Product::new("headphones", "Headphones", "Electronics", 22.0), 1),
        ])
    }

    #[test]
    fn new_run_starts_at_one() {
        let basket = basket();
        let run = PricingRun::new(&basket);

        assert_eq!(run.multipliers().len(), 2, "one entry per product");
        assert_eq!(
            run.multipliers().get(&ProductId::from("apple")),
            Some(1.0),
            "apple starts at 1"
        );
        assert!(run.spent().is_empty(), "nothing spent");
        assert!((run.final_price() - 52.0).abs() < 1e-9, "no discount yet");
    }

    #[test]
    fn scale_where_only_touches_matching_products() {
        let basket = basket();
        let mut run = PricingRun::new(&basket);

        run.scale_where(0.5, |product| product.name == "Apple");
        run.scale_where(0.5, |product| product.name == "Apple");

        assert_eq!(
            run.multipliers().get(&ProductId::from("apple")),
            Some(0.25),
            "compounded"
        );
        assert_eq!(
            run.multipliers().get(&ProductId::from("headphones")),
            Some(1.0),
            "untouched"
        );
        assert!((run.final_price() - 29.5).abs() < 1e-9, "7.5 + 22");
    }

    #[test]
    fn scale_ignores_unknown_products() {
        let mut map = MultiplierMap::for_basket(&basket());
        map.scale(&ProductId::from("banana"), 0.0);

        assert_eq!(map.get(&ProductId::from("banana")), None, "not inserted");
    }
}
