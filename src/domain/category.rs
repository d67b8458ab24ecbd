//! Category reference data.

use crate::domain::Validate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label shown when a product points at a category the client does not know.
pub const UNKNOWN_CATEGORY: &str = "Unknown category";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CategoryId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Validate for Category {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err(format!("category {} has an empty name", self.id));
        }
        Ok(())
    }
}

/// Resolves a category id to its display name, falling back to [`UNKNOWN_CATEGORY`].
#[must_use]
pub fn category_name(categories: &[Category], id: CategoryId) -> &str {
    categories
        .iter()
        .find(|category| category.id == id)
        .map_or(UNKNOWN_CATEGORY, |category| category.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_name_lookup_with_fallback() {
        let categories = vec![
            Category { id: CategoryId(1), name: "Elektronik".to_string() },
            Category { id: CategoryId(2), name: "Fashion".to_string() },
        ];
        assert_eq!(category_name(&categories, CategoryId(2)), "Fashion");
        assert_eq!(category_name(&categories, CategoryId(9)), UNKNOWN_CATEGORY);
        assert_eq!(category_name(&[], CategoryId(1)), UNKNOWN_CATEGORY);
    }
}
