//! Basket

use smallvec::SmallVec;

use crate::products::Product;

/// A product and the quantity of it in the basket.
#[derive(Debug, Clone)]
pub struct BasketLine {
    product: Product,
    quantity: u32,
}

impl BasketLine {
    /// Create a new basket line.
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// The product on this line
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Quantity of the product
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price multiplied by quantity, before any discount.
    pub fn nominal_price(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// Basket
///
/// Lines keep the order products were first added in. Adding a product that is
/// already present increases that line's quantity instead of adding a new line.
#[derive(Debug, Clone, Default)]
pub struct Basket {
    lines: SmallVec<[BasketLine; 8]>,
}

impl Basket {
    /// Create an empty basket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a basket from `(product, quantity)` pairs.
    pub fn with_lines(lines: impl IntoIterator<Item = (Product, u32)>) -> Self {
        let mut basket = Self::new();

        for (product, quantity) in lines {
            basket.add(product, quantity);
        }

        basket
    }

    /// Add a quantity of a product to the basket.
    ///
    /// Adding none of a product leaves the basket unchanged.
    pub fn add(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|line| line.product == product) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(BasketLine::new(product, quantity));
        }
    }

    /// Sum of unit price times quantity over every line, before any discount.
    pub fn original_price(&self) -> f64 {
        self.lines.iter().map(BasketLine::nominal_price).sum()
    }

    /// Quantity of the first line whose product has the given name.
    ///
    /// Returns `None` if no product with that name is in the basket.
    pub fn quantity_of(&self, product_name: &str) -> Option<u32> {
        self.lines
            .iter()
            .find(|line| line.product.name == product_name)
            .map(BasketLine::quantity)
    }

    /// Iterate over the basket lines.
    pub fn iter(&self) -> impl Iterator<Item = &BasketLine> {
        self.lines.iter()
    }

    /// Iterate over the products in the basket.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.lines.iter().map(BasketLine::product)
    }

    /// Get the number of lines in the basket.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<'a> IntoIterator for &'a Basket {
    type Item = &'a BasketLine;
    type IntoIter = std::slice::Iter<'a, BasketLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_basket() -> Basket {
        Basket::with_lines([
            (Product::new("apple", "Apple", "Fruit", 15.0), 2),
            (Product::new("headphones", "Headphones", "Electronics", 22.0), 1),
        ])
    }

    #[test]
    fn original_price_sums_lines() {
        let basket = test_basket();

        assert!(
            (basket.original_price() - 52.0).abs() < f64::EPSILON,
            "expected 52, got {}",
            basket.original_price()
        );
    }

    #[test]
    fn original_price_of_empty_basket_is_zero() {
        assert!(Basket::new().original_price().abs() < f64::EPSILON, "empty");
    }

    #[test]
    fn quantity_of_by_name() {
        let basket = test_basket();

        assert_eq!(basket.quantity_of("Apple"), Some(2), "apple present");
        assert_eq!(basket.quantity_of("Banana"), None, "banana absent");
    }

    #[test]
    fn adding_zero_does_not_make_product_present() {
        let mut basket = test_basket();
        basket.add(Product::new("pear", "Pear", "Fruit", 4.0), 0);

        assert_eq!(basket.len(), 2, "no pear line");
        assert_eq!(basket.quantity_of("Pear"), None, "pear absent");
    }

    #[test]
    fn adding_same_product_merges_quantity() {
        let mut basket = test_basket();
        basket.add(Product::new("apple", "Apple", "Fruit", 15.0), 3);

        assert_eq!(basket.len(), 2, "no new line");
        assert_eq!(basket.quantity_of("Apple"), Some(5), "merged quantity");
    }

    #[test]
    fn len_and_is_empty() {
        assert!(Basket::new().is_empty(), "new basket is empty");
        assert_eq!(test_basket().len(), 2, "two lines");
    }
}
