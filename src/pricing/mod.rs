//! Pricing
//!
//! Walks a store's discount policy over a basket. Each top-level discount is
//! applied once, in policy order, against one shared set of per-product
//! multipliers, so discounts compound across the policy.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    basket::Basket,
    catalog::{DiscountRepository, PolicyRepository, ProductCatalog},
    discounts::DiscountNode,
    graph::PolicyGraph,
    ids::{DiscountId, ProductId, StoreId},
};

pub mod quote;
pub mod run;

pub use quote::{Quote, QuoteLine};
pub use run::{MultiplierMap, PricingRun, SpentSet};

/// Errors that abort a pricing call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The store has no discount policy.
    #[error("store not found: {0}")]
    StoreNotFound(StoreId),

    /// A basket product id did not resolve to a product.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// A basket line asked for none of a product.
    #[error("quantity must be at least 1 for product {0}")]
    ZeroQuantity(ProductId),
}

/// The discount nodes a store's policy can reach, loaded for one run.
#[derive(Debug)]
pub struct PolicySnapshot {
    top_level: SmallVec<[DiscountId; 8]>,
    index: FxHashMap<DiscountId, DiscountNode>,
    cyclic: bool,
}

/// Outcome of visiting one id during the snapshot walk.
enum Visit {
    New(SmallVec<[DiscountId; 4]>),
    Seen,
    Missing,
}

impl PolicySnapshot {
    /// Load the top-level nodes of a store's policy and every node reachable
    /// from them through nested ids.
    ///
    /// Ids that do not resolve are skipped. Each id is loaded at most once, so
    /// cyclic references terminate. The policy graph is only checked for
    /// cycles when the walk reaches a loaded node a second time.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::StoreNotFound`] if the store has no policy.
    pub fn load<R>(repository: &R, store: &StoreId) -> Result<Self, PricingError>
    where
        R: PolicyRepository + DiscountRepository + ?Sized,
    {
        let ids = repository
            .top_level_discounts(store)
            .ok_or_else(|| PricingError::StoreNotFound(store.clone()))?;

        let mut index: FxHashMap<DiscountId, DiscountNode> = FxHashMap::default();
        let mut visited: FxHashSet<DiscountId> = FxHashSet::default();
        let mut top_level = SmallVec::new();
        let mut pending: Vec<DiscountId> = Vec::new();
        let mut revisited = false;

        for id in ids {
            match load_once(repository, &id, &mut visited, &mut index) {
                Visit::New(nested) => {
                    pending.extend(nested);
                    top_level.push(id);
                }
                Visit::Seen => {
                    revisited = true;
                    top_level.push(id);
                }
                Visit::Missing => debug!(discount = %id, "top-level discount not found; skipping"),
            }
        }

        while let Some(id) = pending.pop() {
            match load_once(repository, &id, &mut visited, &mut index) {
                Visit::New(nested) => pending.extend(nested),
                Visit::Seen => revisited = true,
                Visit::Missing => {}
            }
        }

        let cyclic = revisited && PolicyGraph::from_nodes(index.values()).is_cyclic();

        Ok(Self {
            top_level,
            index,
            cyclic,
        })
    }

    /// Whether the loaded nodes reference each other in a cycle.
    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    /// Top-level node ids that resolved, in policy order.
    pub fn top_level(&self) -> &[DiscountId] {
        &self.top_level
    }

    /// Look up a loaded node.
    pub fn get(&self, id: &DiscountId) -> Option<&DiscountNode> {
        self.index.get(id)
    }

    /// The resolved immediate nested nodes of a node, in order.
    ///
    /// Unresolved nested ids are left out.
    pub fn nested(&self, node: &DiscountNode) -> SmallVec<[&DiscountNode; 4]> {
        node.nested_ids
            .iter()
            .filter_map(|id| {
                let nested = self.index.get(id);

                if nested.is_none() {
                    debug!(discount = %node.id, nested = %id, "nested discount not found; skipping");
                }

                nested
            })
            .collect()
    }

    /// Number of loaded nodes.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if no node was loaded.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Graph of the loaded nodes.
    pub fn graph(&self) -> PolicyGraph {
        PolicyGraph::from_nodes(self.index.values())
    }

    /// Apply every top-level node, in policy order, to the run.
    pub fn apply(&self, run: &mut PricingRun<'_>) {
        for id in &self.top_level {
            let Some(node) = self.index.get(id) else {
                continue;
            };

            let nested = self.nested(node);
            node.apply_discount(run, &nested);
        }
    }
}

/// Loads `id` into the index the first time it is seen, returning its nested ids.
fn load_once<R>(
    repository: &R,
    id: &DiscountId,
    visited: &mut FxHashSet<DiscountId>,
    index: &mut FxHashMap<DiscountId, DiscountNode>,
) -> Visit
where
    R: DiscountRepository + ?Sized,
{
    if !visited.insert(id.clone()) {
        return if index.contains_key(id) {
            Visit::Seen
        } else {
            Visit::Missing
        };
    }

    let Some(node) = repository.discount(id) else {
        debug!(discount = %id, "discount not found; skipping");
        return Visit::Missing;
    };

    let nested = node.nested_ids.clone();
    index.insert(id.clone(), node);

    Visit::New(nested)
}

/// Prices baskets against store discount policies.
#[derive(Debug, Clone)]
pub struct PricingEngine<S> {
    source: S,
}

impl<S> PricingEngine<S>
where
    S: ProductCatalog + DiscountRepository + PolicyRepository,
{
    /// Create an engine backed by the given catalog.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Resolve product ids into a basket.
    ///
    /// Quantities for a product id given more than once are summed.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::ProductNotFound`] for the first id that does not
    /// resolve, or [`PricingError::ZeroQuantity`] for a line with quantity 0.
    pub fn basket(
        &self,
        quantities: impl IntoIterator<Item = (ProductId, u32)>,
    ) -> Result<Basket, PricingError> {
        let mut basket = Basket::new();

        for (id, quantity) in quantities {
            if quantity == 0 {
                return Err(PricingError::ZeroQuantity(id));
            }

            let product = self
                .source
                .product(&id)
                .ok_or(PricingError::ProductNotFound(id))?;

            basket.add(product, quantity);
        }

        Ok(basket)
    }

    /// Calculate the final price of a basket for a store.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the store or any product is unknown.
    pub fn calculate_price(
        &self,
        store: &StoreId,
        quantities: impl IntoIterator<Item = (ProductId, u32)>,
    ) -> Result<f64, PricingError> {
        self.quote(store, quantities).map(|quote| quote.total())
    }

    /// Price a basket for a store, with a per-line breakdown.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the store or any product is unknown.
    #[tracing::instrument(name = "pricing.quote", skip_all, fields(store = %store), err)]
    pub fn quote(
        &self,
        store: &StoreId,
        quantities: impl IntoIterator<Item = (ProductId, u32)>,
    ) -> Result<Quote, PricingError> {
        let snapshot = PolicySnapshot::load(&self.source, store)?;
        let basket = self.basket(quantities)?;

        Ok(quote_with(store, &snapshot, &basket))
    }

    /// Price an already resolved basket for a store.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::StoreNotFound`] if the store is unknown.
    pub fn quote_basket(&self, store: &StoreId, basket: &Basket) -> Result<Quote, PricingError> {
        let snapshot = PolicySnapshot::load(&self.source, store)?;

        Ok(quote_with(store, &snapshot, basket))
    }
}

fn quote_with(store: &StoreId, snapshot: &PolicySnapshot, basket: &Basket) -> Quote {
    if snapshot.is_cyclic() {
        warn!(store = %store, "discount policy contains a cycle");
    }

    let mut run = PricingRun::new(basket);
    snapshot.apply(&mut run);

    let original_price = run.original_price();
    let total = run.final_price();
    let (multipliers, fired) = run.into_parts();

    let lines = basket
        .iter()
        .map(|line| QuoteLine {
            product: line.product().clone(),
            quantity: line.quantity(),
            multiplier: multipliers.get(&line.product().id).unwrap_or(1.0),
        })
        .collect();

    info!(
        store = %store,
        lines = basket.len(),
        discounts = snapshot.top_level().len(),
        fired = fired.len(),
        original_price,
        total,
        "priced basket"
    );

    Quote::new(store.clone(), lines, original_price, total, fired.into_vec())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{catalog::InMemoryCatalog, products::Product};

    use super::*;

    fn catalog(nodes: Vec<DiscountNode>, policy: &[&str]) -> Result<InMemoryCatalog, Box<dyn std::error::Error>> {
        let mut catalog = InMemoryCatalog::new();

        catalog.insert_product(Product::new("apple", "Apple", "Fruit", 15.0))?;
        catalog.insert_product(Product::new("headphones", "Headphones", "Electronics", 22.0))?;

        for node in nodes {
            catalog.insert_discount(node)?;
        }

        catalog.insert_policy("s1", policy.iter().copied().map(DiscountId::from))?;

        Ok(catalog)
    }

    fn basket() -> [(ProductId, u32); 2] {
        [
            (ProductId::from("apple"), 2),
            (ProductId::from("headphones"), 1),
        ]
    }

    #[test]
    fn snapshot_loads_reachable_nodes_once() -> TestResult {
        let catalog = catalog(
            vec![
                DiscountNode::new("a", "s1", 0.1).with_nested(["b", "ghost"]),
                DiscountNode::new("b", "s1", 0.1).with_nested(["c", "a"]),
                DiscountNode::new("c", "s1", 0.1),
                DiscountNode::new("unused", "s1", 0.1),
            ],
            &["a", "missing"],
        )?;

        let snapshot = PolicySnapshot::load(&catalog, &StoreId::from("s1"))?;

        assert_eq!(snapshot.top_level(), &[DiscountId::from("a")], "missing skipped");
        assert_eq!(snapshot.len(), 3, "a, b, c");
        assert!(snapshot.get(&DiscountId::from("unused")).is_none(), "unreachable");
        assert!(snapshot.is_cyclic(), "a <-> b");

        Ok(())
    }

    #[test]
    fn shared_nested_node_is_not_a_cycle() -> TestResult {
        let catalog = catalog(
            vec![
                DiscountNode::new("a", "s1", 0.1).with_nested(["b", "c"]),
                DiscountNode::new("b", "s1", 0.1).with_nested(["d"]),
                DiscountNode::new("c", "s1", 0.1).with_nested(["d"]),
                DiscountNode::new("d", "s1", 0.1),
            ],
            &["a", "a"],
        )?;

        let snapshot = PolicySnapshot::load(&catalog, &StoreId::from("s1"))?;

        assert_eq!(snapshot.len(), 4, "d loaded once");
        assert_eq!(snapshot.top_level().len(), 2, "duplicate id kept in order");
        assert!(!snapshot.is_cyclic(), "diamond is acyclic");

        Ok(())
    }

    #[test]
    fn zero_quantity_fails() -> TestResult {
        let catalog = catalog(Vec::new(), &[])?;
        let engine = PricingEngine::new(&catalog);

        assert_eq!(
            engine.calculate_price(
                &StoreId::from("s1"),
                [(ProductId::from("apple"), 0), (ProductId::from("headphones"), 1)]
            ),
            Err(PricingError::ZeroQuantity(ProductId::from("apple"))),
            "zero quantity"
        );

        Ok(())
    }

    #[test]
    fn unknown_store_fails() -> TestResult {
        let catalog = catalog(Vec::new(), &[])?;
        let engine = PricingEngine::new(&catalog);

        assert_eq!(
            engine.calculate_price(&StoreId::from("nope"), basket()),
            Err(PricingError::StoreNotFound(StoreId::from("nope"))),
            "store"
        );

        Ok(())
    }

    #[test]
    fn unknown_product_fails() -> TestResult {
        let catalog = catalog(Vec::new(), &[])?;
        let engine = PricingEngine::new(&catalog);

        assert_eq!(
            engine.calculate_price(&StoreId::from("s1"), [(ProductId::from("banana"), 1)]),
            Err(PricingError::ProductNotFound(ProductId::from("banana"))),
            "product"
        );

        Ok(())
    }

    #[test]
    fn cyclic_policy_terminates() -> TestResult {
        let catalog = catalog(
            vec![
                DiscountNode::new("a", "s1", 0.1).with_nested(["b"]),
                DiscountNode::new("b", "s1", 0.1).with_nested(["a"]),
            ],
            &["a", "b"],
        )?;
        let engine = PricingEngine::new(&catalog);

        let quote = engine.quote(&StoreId::from("s1"), basket())?;

        // a fires with b nested (20% off); b is then spent.
        assert!((quote.total() - 41.6).abs() < 1e-9, "got {}", quote.total());
        assert_eq!(quote.fired(), &[DiscountId::from("a")], "only a fires");

        Ok(())
    }

    #[test]
    fn quote_lines_carry_multipliers() -> TestResult {
        let catalog = catalog(
            vec![
                DiscountNode::new("d1", "s1", 0.1)
                    .with_scope(crate::discounts::Scope::Product("Apple".into())),
            ],
            &["d1"],
        )?;
        let engine = PricingEngine::new(&catalog);

        let quote = engine.quote(&StoreId::from("s1"), basket())?;
        let multipliers: Vec<f64> = quote.lines().iter().map(|line| line.multiplier).collect();

        assert_eq!(quote.lines().len(), 2, "two lines");
        assert!((multipliers.first().copied().unwrap_or_default() - 0.9).abs() < 1e-9, "apple");
        assert!((multipliers.get(1).copied().unwrap_or_default() - 1.0).abs() < 1e-9, "headphones");
        assert!((quote.original_price() - 52.0).abs() < 1e-9, "original");
        assert!((quote.total() - 49.0).abs() < 1e-9, "total");

        Ok(())
    }
}
