//! Trellis prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketLine},
    catalog::{
        DiscountRepository, InMemoryCatalog, PolicyRepository, ProductCatalog,
        memory::CatalogError,
    },
    discounts::{Condition, DiscountNode, LogicComposition, NumericalComposition, Scope},
    fixtures::{Fixture, FixtureError},
    graph::{PolicyGraph, PolicyGraphError},
    ids::{DiscountId, ProductId, StoreId},
    pricing::{
        MultiplierMap, PolicySnapshot, PricingEngine, PricingError, PricingRun, Quote, QuoteLine,
        SpentSet,
    },
    products::Product,
    receipt::{Receipt, ReceiptError},
};
