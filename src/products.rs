//! Products

use crate::ids::ProductId;

/// Product
///
/// Read-only catalogue entry. Two products are the same product when their ids
/// match, regardless of the other fields.
#[derive(Debug, Clone)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product category
    pub category: String,

    /// Unit price
    pub price: f64,
}

impl Product {
    /// Create a new product.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            price,
        }
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Product {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_id() {
        let a = Product::new("p1", "Apple", "Fruit", 1.0);
        let b = Product::new("p1", "Renamed", "Other", 2.0);
        let c = Product::new("p2", "Apple", "Fruit", 1.0);

        assert_eq!(a, b, "same id, different fields");
        assert_ne!(a, c, "different id, same fields");
    }
}
