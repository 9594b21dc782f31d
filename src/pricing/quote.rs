//! Quotes

use crate::{
    ids::{DiscountId, StoreId},
    products::Product,
};

/// A priced basket line.
#[derive(Debug, Clone)]
pub struct QuoteLine {
    /// The product
    pub product: Product,

    /// Quantity purchased
    pub quantity: u32,

    /// Final multiplier applied to the unit price
    pub multiplier: f64,
}

impl QuoteLine {
    /// Unit price times quantity, before discounts.
    pub fn original_price(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }

    /// Unit price after discounts.
    pub fn unit_price(&self) -> f64 {
        self.product.price * self.multiplier
    }

    /// Line total after discounts.
    pub fn total(&self) -> f64 {
        self.product.price * self.multiplier * f64::from(self.quantity)
    }
}

/// Result of pricing a basket against a store's discount policy.
#[derive(Debug, Clone)]
pub struct Quote {
    store: StoreId,
    lines: Vec<QuoteLine>,
    original_price: f64,
    total: f64,
    fired: Vec<DiscountId>,
}

impl Quote {
    /// Create a new quote.
    pub fn new(
        store: StoreId,
        lines: Vec<QuoteLine>,
        original_price: f64,
        total: f64,
        fired: Vec<DiscountId>,
    ) -> Self {
        Self {
            store,
            lines,
            original_price,
            total,
            fired,
        }
    }

    /// Store the basket was priced for
    pub fn store(&self) -> &StoreId {
        &self.store
    }

    /// Priced lines, in basket order
    pub fn lines(&self) -> &[QuoteLine] {
        &self.lines
    }

    /// Basket total before discounts
    pub fn original_price(&self) -> f64 {
        self.original_price
    }

    /// Basket total after discounts
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Amount saved by discounts
    pub fn savings(&self) -> f64 {
        self.original_price - self.total
    }

    /// Savings as a fraction of the original price.
    ///
    /// An empty or zero-priced basket saves nothing.
    pub fn savings_fraction(&self) -> f64 {
        if self.original_price <= 0.0 {
            return 0.0;
        }

        self.savings() / self.original_price
    }

    /// Ids of the discount nodes that fired, in firing order.
    pub fn fired(&self) -> &[DiscountId] {
        &self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_and_quote_arithmetic() {
        let line = QuoteLine {
            product: Product::new("apple", "Apple", "Fruit", 15.0),
            quantity: 2,
            multiplier: 0.9,
        };

        assert!((line.original_price() - 30.0).abs() < 1e-9, "original");
        assert!((line.unit_price() - 13.5).abs() < 1e-9, "unit");
        assert!((line.total() - 27.0).abs() < 1e-9, "total");

        let quote = Quote::new(StoreId::from("s1"), vec![line], 30.0, 27.0, Vec::new());

        assert!((quote.savings() - 3.0).abs() < 1e-9, "savings");
        assert!((quote.savings_fraction() - 0.1).abs() < 1e-9, "fraction");
    }

    #[test]
    fn empty_quote_saves_nothing() {
        let quote = Quote::new(StoreId::from("s1"), Vec::new(), 0.0, 0.0, Vec::new());

        assert!(quote.savings_fraction().abs() < f64::EPSILON, "no division by zero");
    }
}
