//! In-memory catalog

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::{
    catalog::{DiscountRepository, PolicyRepository, ProductCatalog},
    discounts::DiscountNode,
    ids::{DiscountId, ProductId, StoreId},
    products::Product,
};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

new_key_type! {
    /// Discount Key
    pub struct DiscountKey;
}

/// Errors raised while populating an [`InMemoryCatalog`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A product with this id has already been inserted.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// A discount with this id has already been inserted.
    #[error("duplicate discount id: {0}")]
    DuplicateDiscount(DiscountId),

    /// A policy for this store has already been inserted.
    #[error("duplicate store id: {0}")]
    DuplicateStore(StoreId),
}

/// Catalog held entirely in memory.
///
/// Entities live in `SlotMap`s, with string ids mapped to slot keys for lookup.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: SlotMap<ProductKey, Product>,
    discounts: SlotMap<DiscountKey, DiscountNode>,

    product_keys: FxHashMap<ProductId, ProductKey>,
    discount_keys: FxHashMap<DiscountId, DiscountKey>,

    policies: FxHashMap<StoreId, Vec<DiscountId>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProduct`] if the id is already present.
    pub fn insert_product(&mut self, product: Product) -> Result<ProductKey, CatalogError> {
        if self.product_keys.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        let id = product.id.clone();
        let key = self.products.insert(product);
        self.product_keys.insert(id, key);

        Ok(key)
    }

    /// Insert a discount node.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateDiscount`] if the id is already present.
    pub fn insert_discount(&mut self, node: DiscountNode) -> Result<DiscountKey, CatalogError> {
        if self.discount_keys.contains_key(&node.id) {
            return Err(CatalogError::DuplicateDiscount(node.id));
        }

        let id = node.id.clone();
        let key = self.discounts.insert(node);
        self.discount_keys.insert(id, key);

        Ok(key)
    }

    /// Set a store's ordered top-level discount ids.
    ///
    /// Ids do not need to resolve; unresolved ids are skipped when pricing.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateStore`] if the store already has a policy.
    pub fn insert_policy(
        &mut self,
        store: impl Into<StoreId>,
        discounts: impl IntoIterator<Item = DiscountId>,
    ) -> Result<(), CatalogError> {
        let store = store.into();

        if self.policies.contains_key(&store) {
            return Err(CatalogError::DuplicateStore(store));
        }

        self.policies.insert(store, discounts.into_iter().collect());

        Ok(())
    }

    /// Borrow a discount node by id.
    pub fn get_discount(&self, id: &DiscountId) -> Option<&DiscountNode> {
        self.discount_keys
            .get(id)
            .and_then(|key| self.discounts.get(*key))
    }

    /// Borrow a product by id.
    pub fn get_product(&self, id: &ProductId) -> Option<&Product> {
        self.product_keys
            .get(id)
            .and_then(|key| self.products.get(*key))
    }

    /// Iterate over every discount node.
    pub fn discounts(&self) -> impl Iterator<Item = &DiscountNode> {
        self.discounts.values()
    }

    /// Iterate over every store and its policy.
    pub fn policies(&self) -> impl Iterator<Item = (&StoreId, &[DiscountId])> {
        self.policies
            .iter()
            .map(|(store, ids)| (store, ids.as_slice()))
    }

    /// Number of products
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Number of discount nodes
    pub fn discount_count(&self) -> usize {
        self.discounts.len()
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn product(&self, id: &ProductId) -> Option<Product> {
        self.get_product(id).cloned()
    }
}

impl DiscountRepository for InMemoryCatalog {
    fn discount(&self, id: &DiscountId) -> Option<DiscountNode> {
        self.get_discount(id).cloned()
    }
}

impl PolicyRepository for InMemoryCatalog {
    fn top_level_discounts(&self, store: &StoreId) -> Option<Vec<DiscountId>> {
        self.policies.get(store).cloned()
    }
}
