//! Fixtures
//!
//! A fixture is a YAML document describing products, discount nodes, each
//! store's ordered discount policy and, optionally, a basket:
//!
//! ```yaml
//! products:
//!   apple: { name: Apple, category: Fruit, price: "15.00" }
//! discounts:
//!   apple-10: { store: main, level: product, discounted: Apple, percent: "10%" }
//! stores:
//!   main: [apple-10]
//! basket:
//!   - { product: apple, quantity: 2 }
//! ```

use std::{
    fs,
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    catalog::{InMemoryCatalog, memory::CatalogError},
    fixtures::{discounts::DiscountFixture, products::ProductFixture},
    graph::{PolicyGraph, PolicyGraphError},
    ids::{DiscountId, ProductId, StoreId},
};

pub mod discounts;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Duplicate entity ids
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A store's policy lists a discount owned by another store
    #[error("Store {store} lists discount {discount} owned by store {owner}")]
    StoreMismatch {
        /// Store whose policy lists the discount
        store: StoreId,

        /// The discount id
        discount: DiscountId,

        /// Store the discount belongs to
        owner: StoreId,
    },

    /// Basket line references an unknown product
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Nested discount references form a cycle
    #[error(transparent)]
    Policy(#[from] PolicyGraphError),
}

#[derive(Debug, Deserialize)]
struct FixtureDocument {
    #[serde(default)]
    products: FxHashMap<String, ProductFixture>,

    #[serde(default)]
    discounts: FxHashMap<String, DiscountFixture>,

    #[serde(default)]
    stores: FxHashMap<String, Vec<String>>,

    #[serde(default)]
    basket: Vec<BasketLineFixture>,
}

#[derive(Debug, Deserialize)]
struct BasketLineFixture {
    product: String,
    quantity: NonZeroU32,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    catalog: InMemoryCatalog,
    basket: Vec<(ProductId, u32)>,
}

impl Fixture {
    /// Load a named fixture set from `./fixtures/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid fixture.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_path(PathBuf::from("./fixtures").join(format!("{name}.yml")))
    }

    /// Load a fixture from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid fixture.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::parse(&contents)
    }

    /// Parse a fixture from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not parse, any price or percentage is
    /// invalid, an id is duplicated, a store lists another store's discount,
    /// the basket names an unknown product or nested discounts form a cycle.
    pub fn parse(yaml: &str) -> Result<Self, FixtureError> {
        let document: FixtureDocument = serde_norway::from_str(yaml)?;
        let mut catalog = InMemoryCatalog::new();

        for (id, product) in document.products {
            catalog.insert_product(product.into_product(ProductId::from(id))?)?;
        }

        for (id, discount) in document.discounts {
            catalog.insert_discount(discount.into_node(DiscountId::from(id))?)?;
        }

        for (store, ids) in document.stores {
            let store = StoreId::from(store);
            let ids: Vec<DiscountId> = ids.into_iter().map(DiscountId::from).collect();

            for id in &ids {
                if let Some(node) = catalog.get_discount(id)
                    && node.store_id != store
                {
                    return Err(FixtureError::StoreMismatch {
                        store,
                        discount: id.clone(),
                        owner: node.store_id.clone(),
                    });
                }
            }

            catalog.insert_policy(store, ids)?;
        }

        PolicyGraph::from_nodes(catalog.discounts()).validate()?;

        let basket = document
            .basket
            .into_iter()
            .map(|line| {
                let id = ProductId::from(line.product);

                if catalog.get_product(&id).is_none() {
                    return Err(FixtureError::ProductNotFound(id.to_string()));
                }

                Ok((id, line.quantity.get()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { catalog, basket })
    }

    /// The loaded catalog
    pub fn catalog(&self) -> &InMemoryCatalog {
        &self.catalog
    }

    /// Basket lines declared in the fixture, in declaration order.
    pub fn basket(&self) -> &[(ProductId, u32)] {
        &self.basket
    }
}
