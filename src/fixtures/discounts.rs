//! Discount Fixtures

use serde::Deserialize;

use crate::{
    discounts::{Condition, DiscountNode, LogicComposition, NumericalComposition, Scope},
    fixtures::FixtureError,
    ids::{DiscountId, StoreId},
};

/// Discount level as written in fixtures.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelFixture {
    /// No level
    #[default]
    Undefined,

    /// Product level
    Product,

    /// Category level
    Category,

    /// Store level
    Store,
}

/// Condition kind as written in fixtures.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionFixture {
    /// No condition
    #[default]
    Undefined,

    /// Explicitly unconditional
    None,

    /// Minimum original basket price
    MinPrice,

    /// Minimum quantity of a product
    MinQuantity,

    /// Maximum quantity of a product
    MaxQuantity,
}

/// Discount Fixture
#[derive(Debug, Deserialize)]
pub struct DiscountFixture {
    /// Owning store
    pub store: String,

    /// Scope level
    #[serde(default)]
    pub level: LevelFixture,

    /// Scope target: product name or category name, depending on level
    #[serde(default)]
    pub discounted: String,

    /// Logic composition
    #[serde(default)]
    pub logic: LogicComposition,

    /// Numerical composition
    #[serde(default)]
    pub numerical: NumericalComposition,

    /// Discount percentage (e.g., "15%" or "0.15")
    pub percent: String,

    /// Condition kind
    #[serde(default)]
    pub condition: ConditionFixture,

    /// Condition threshold
    #[serde(default)]
    pub limiter: f64,

    /// Product name inspected by quantity conditions
    #[serde(default)]
    pub condition_product: String,

    /// Nested discount ids
    #[serde(default)]
    pub nested: Vec<String>,
}

impl DiscountFixture {
    /// Build a discount node with the given id from this fixture.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::InvalidPercentage`] if the percentage does not parse.
    pub fn into_node(self, id: DiscountId) -> Result<DiscountNode, FixtureError> {
        let percent = parse_percentage(&self.percent)?;

        let scope = match self.level {
            LevelFixture::Undefined => Scope::Undefined,
            LevelFixture::Store => Scope::Store,
            LevelFixture::Product => Scope::Product(self.discounted),
            LevelFixture::Category => Scope::Category(self.discounted),
        };

        let condition = match self.condition {
            ConditionFixture::Undefined => Condition::Undefined,
            ConditionFixture::None => Condition::Unconditional,
            ConditionFixture::MinPrice => Condition::MinPrice(self.limiter),
            ConditionFixture::MinQuantity => Condition::MinQuantity {
                product: self.condition_product,
                limit: self.limiter,
            },
            ConditionFixture::MaxQuantity => Condition::MaxQuantity {
                product: self.condition_product,
                limit: self.limiter,
            },
        };

        Ok(DiscountNode::new(id, StoreId::from(self.store), percent)
            .with_scope(scope)
            .with_logic(self.logic)
            .with_numerical(self.numerical)
            .with_condition(condition)
            .with_nested(self.nested))
    }
}

/// Parse percentage string (e.g., "15%" or "0.15") into a fraction.
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or is not finite.
pub fn parse_percentage(s: &str) -> Result<f64, FixtureError> {
    let trimmed = s.trim();

    let value = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<f64>()
            .map(|value| value / 100.0)
    } else {
        trimmed.parse::<f64>()
    }
    .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

    if !value.is_finite() {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_percentage_formats() -> TestResult {
        assert!((parse_percentage("15%")? - 0.15).abs() < 1e-9, "percent");
        assert!((parse_percentage("0.15")? - 0.15).abs() < 1e-9, "decimal");
        assert!((parse_percentage(" 5 % ")? - 0.05).abs() < 1e-9, "padded");

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_garbage() {
        for bad in ["", "%", "ten", "NaN%"] {
            assert!(
                matches!(parse_percentage(bad), Err(FixtureError::InvalidPercentage(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn into_node_maps_tagged_fields() -> TestResult {
        let yaml = r"
store: main
level: product
discounted: Apple
logic: xor
numerical: maximum
percent: 10%
condition: min_quantity
limiter: 3
condition_product: Apple
nested: [a, b]
";

        let fixture: DiscountFixture = serde_norway::from_str(yaml)?;
        let node = fixture.into_node(DiscountId::from("d1"))?;

        assert_eq!(node.store_id, StoreId::from("main"), "store");
        assert_eq!(node.scope, Scope::Product("Apple".to_string()), "scope");
        assert_eq!(node.logic, LogicComposition::Xor, "logic");
        assert_eq!(node.numerical, NumericalComposition::Maximum, "numerical");
        assert_eq!(
            node.condition,
            Condition::MinQuantity {
                product: "Apple".to_string(),
                limit: 3.0
            },
            "condition"
        );
        assert_eq!(node.nested_ids.len(), 2, "nested");
        assert!((node.percent - 0.1).abs() < 1e-9, "percent");

        Ok(())
    }

    #[test]
    fn into_node_defaults() -> TestResult {
        let fixture: DiscountFixture = serde_norway::from_str("store: main\npercent: '0.2'\n")?;
        let node = fixture.into_node(DiscountId::from("d1"))?;

        assert_eq!(node.scope, Scope::Undefined, "scope");
        assert_eq!(node.logic, LogicComposition::Undefined, "logic");
        assert_eq!(node.numerical, NumericalComposition::Undefined, "numerical");
        assert_eq!(node.condition, Condition::Undefined, "condition");
        assert!(node.nested_ids.is_empty(), "nested");

        Ok(())
    }
}
