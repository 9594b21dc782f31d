//! Catalog
//!
//! Lookups the pricing engine needs from the outside world. Anything that can
//! answer these (a database, a cache, a fixture file) can back a
//! [`PricingEngine`](crate::pricing::PricingEngine).

use crate::{
    discounts::DiscountNode,
    ids::{DiscountId, ProductId, StoreId},
    products::Product,
};

pub mod memory;

pub use memory::InMemoryCatalog;

/// Product lookup
pub trait ProductCatalog {
    /// Load a product by id.
    fn product(&self, id: &ProductId) -> Option<Product>;
}

/// Discount rule lookup
pub trait DiscountRepository {
    /// Load a discount node by id.
    fn discount(&self, id: &DiscountId) -> Option<DiscountNode>;
}

/// Store discount policy lookup
pub trait PolicyRepository {
    /// The store's top-level discount ids, in application order.
    ///
    /// Returns `None` if the store is unknown.
    fn top_level_discounts(&self, store: &StoreId) -> Option<Vec<DiscountId>>;
}

impl<T: ProductCatalog + ?Sized> ProductCatalog for &T {
    fn product(&self, id: &ProductId) -> Option<Product> {
        (**self).product(id)
    }
}

impl<T: DiscountRepository + ?Sized> DiscountRepository for &T {
    fn discount(&self, id: &DiscountId) -> Option<DiscountNode> {
        (**self).discount(id)
    }
}

impl<T: PolicyRepository + ?Sized> PolicyRepository for &T {
    fn top_level_discounts(&self, store: &StoreId) -> Option<Vec<DiscountId>> {
        (**self).top_level_discounts(store)
    }
}
