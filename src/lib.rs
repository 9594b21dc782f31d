//! Trellis
//!
//! Trellis is a discount composition and basket pricing engine. A store's
//! discount policy is an ordered list of discount rules; each rule can nest
//! other rules, gate on basket conditions, combine its group's conditions with
//! Boolean logic and compose the group's percentages into a single per-product
//! price multiplier.
//!
//! ```
//! use trellis::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut catalog = InMemoryCatalog::new();
//!
//! catalog.insert_product(Product::new("apple", "Apple", "Fruit", 15.0))?;
//! catalog.insert_product(Product::new("headphones", "Headphones", "Electronics", 22.0))?;
//! catalog.insert_discount(
//!     DiscountNode::new("apple-10", "main", 0.10)
//!         .with_scope(Scope::Product("Apple".into()))
//!         .with_numerical(NumericalComposition::Multiplication),
//! )?;
//! catalog.insert_policy("main", [DiscountId::from("apple-10")])?;
//!
//! let engine = PricingEngine::new(&catalog);
//! let total = engine.calculate_price(
//!     &StoreId::from("main"),
//!     [(ProductId::from("apple"), 2), (ProductId::from("headphones"), 1)],
//! )?;
//!
//! assert!((total - 49.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```

pub mod basket;
pub mod catalog;
pub mod config;
pub mod discounts;
pub mod fixtures;
pub mod graph;
pub mod ids;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
