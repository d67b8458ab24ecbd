//! Product model.
//!
//! Products are owned by the backend; the client only ever holds replaceable
//! snapshots. Field names on the wire are camelCase with a few legacy names
//! (`imgUrl`, `stock`, `discount`), mapped here to descriptive Rust names.

use crate::domain::category::CategoryId;
use crate::domain::Validate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable backend identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A marketplace product as served by `/getAllProduct` and friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub current_price: f64,
    pub original_price: f64,
    #[serde(rename = "imgUrl")]
    pub image_url: String,
    #[serde(rename = "stock")]
    pub stock_count: u32,
    pub category_id: CategoryId,
    /// Discount in whole percent, 0 to 100.
    #[serde(rename = "discount")]
    pub discount_percent: f64,
}

impl Product {
    /// A product is discounted when it sells below its original price.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.original_price > self.current_price
    }
}

impl Validate for Product {
    fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("currentPrice", self.current_price),
            ("originalPrice", self.original_price),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("product {}: {field} must be a non-negative number, got {value}", self.id));
            }
        }
        if !(0.0..=100.0).contains(&self.discount_percent) {
            return Err(format!(
                "product {}: discount must be within 0..=100, got {}",
                self.id, self.discount_percent
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample(id: u64, name: &str, category: u64) -> Product {
    Product {
        id: ProductId(id),
        name: name.to_string(),
        current_price: 80_000.0,
        original_price: 100_000.0,
        image_url: format!("https://images.example.test/{id}.jpg"),
        stock_count: 12,
        category_id: CategoryId(category),
        discount_percent: 20.0,
    }
}
