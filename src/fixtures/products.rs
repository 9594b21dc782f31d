//! Product Fixtures

use serde::Deserialize;

use crate::{fixtures::FixtureError, ids::ProductId, products::Product};

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product category
    #[serde(default)]
    pub category: String,

    /// Unit price (e.g., "2.99")
    pub price: String,
}

impl ProductFixture {
    /// Build a product with the given id from this fixture.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::InvalidPrice`] if the price does not parse.
    pub fn into_product(self, id: ProductId) -> Result<Product, FixtureError> {
        let price = parse_price(&self.price)?;

        Ok(Product {
            id,
            name: self.name,
            category: self.category,
            price,
        })
    }
}

/// Parse a price string (e.g., "2.99").
///
/// # Errors
///
/// Returns an error if the amount is not a finite, non-negative number.
pub fn parse_price(s: &str) -> Result<f64, FixtureError> {
    let amount = s
        .trim()
        .parse::<f64>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    Ok(amount)
}
