//! Discount conditions

use crate::basket::Basket;

/// Activation condition of a single discount node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Condition {
    /// No condition configured.
    #[default]
    Undefined,

    /// Explicitly unconditional.
    Unconditional,

    /// The basket's original price must be at least this amount.
    MinPrice(f64),

    /// The named product must be in the basket at least `limit` times.
    MinQuantity {
        /// Product name to look for
        product: String,

        /// Inclusive lower bound on quantity
        limit: f64,
    },

    /// The named product must be in the basket at most `limit` times.
    MaxQuantity {
        /// Product name to look for
        product: String,

        /// Inclusive upper bound on quantity
        limit: f64,
    },
}

impl Condition {
    /// Evaluate the condition against the basket.
    ///
    /// `original_price` is the basket total before any discount. Quantity
    /// conditions on a product that is not in the basket never hold.
    pub fn evaluate(&self, original_price: f64, basket: &Basket) -> bool {
        match self {
            Condition::Undefined | Condition::Unconditional => true,
            Condition::MinPrice(limit) => original_price >= *limit,
            Condition::MinQuantity { product, limit } => basket
                .quantity_of(product)
                .is_some_and(|quantity| f64::from(quantity) >= *limit),
            Condition::MaxQuantity { product, limit } => basket
                .quantity_of(product)
                .is_some_and(|quantity| f64::from(quantity) <= *limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::products::Product;

    use super::*;

    fn basket() -> Basket {
        Basket::with_lines([
            (Product::new("apple", "Apple", "Fruit", 15.0), 2),
            (Product::new("headphones", "Headphones", "Electronics", 22.0), 1),
        ])
    }

    fn min_qty(product: &str, limit: f64) -> Condition {
        Condition::MinQuantity {
            product: product.to_string(),
            limit,
        }
    }

    fn max_qty(product: &str, limit: f64) -> Condition {
        Condition::MaxQuantity {
            product: product.to_string(),
            limit,
        }
    }

    #[test]
    fn undefined_and_unconditional_always_hold() {
        let basket = Basket::new();

        assert!(Condition::Undefined.evaluate(0.0, &basket), "undefined");
        assert!(Condition::Unconditional.evaluate(0.0, &basket), "none");
    }

    #[test]
    fn min_price_is_inclusive() {
        let basket = basket();

        assert!(Condition::MinPrice(52.0).evaluate(52.0, &basket), "equal");
        assert!(Condition::MinPrice(50.0).evaluate(52.0, &basket), "above");
        assert!(!Condition::MinPrice(60.0).evaluate(52.0, &basket), "below");
    }

    #[test]
    fn min_quantity_bounds() {
        let basket = basket();

        assert!(min_qty("Apple", 2.0).evaluate(52.0, &basket), "equal");
        assert!(!min_qty("Apple", 3.0).evaluate(52.0, &basket), "below");
    }

    #[test]
    fn max_quantity_bounds() {
        let basket = basket();

        assert!(max_qty("Apple", 2.0).evaluate(52.0, &basket), "equal");
        assert!(!max_qty("Apple", 1.0).evaluate(52.0, &basket), "above");
    }

    #[test]
    fn quantity_conditions_fail_when_product_absent() {
        let basket = basket();

        assert!(!min_qty("Banana", 0.0).evaluate(52.0, &basket), "min absent");
        assert!(!max_qty("Banana", 10.0).evaluate(52.0, &basket), "max absent");
    }
}
