//! Product reviews and the rating statistics derived from them.

use crate::domain::product::ProductId;
use crate::domain::Validate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(pub u64);

/// One customer review.
///
/// The backend sends the timestamp as an RFC 2822 string under `tanggal`
/// (for example `Tue, 01 Apr 2025 10:55:59 GMT`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub rating: u8,
    #[serde(rename = "review")]
    pub body: String,
    #[serde(rename = "tanggal", deserialize_with = "deserialize_rfc2822")]
    pub posted_at: DateTime<Utc>,
}

fn deserialize_rfc2822<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc2822(&raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| serde::de::Error::custom(format!("invalid review date `{raw}`: {e}")))
}

impl Validate for Review {
    fn validate(&self) -> Result<(), String> {
        if !(1..=5).contains(&self.rating) {
            return Err(format!(
                "review {}: rating must be within 1..=5, got {}",
                self.id.0, self.rating
            ));
        }
        Ok(())
    }
}

/// Mean rating over `reviews`; exactly `0.0` for an empty set.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: u32 = reviews.iter().map(|review| u32::from(review.rating)).sum();
    f64::from(total) / reviews.len() as f64
}

#[cfg(test)]
pub(crate) fn sample(id: u64, product: u64, rating: u8) -> Review {
    Review {
        id: ReviewId(id),
        product_id: ProductId(product),
        rating,
        body: format!("review {id}"),
        posted_at: DateTime::parse_from_rfc2822("Tue, 01 Apr 2025 10:55:59 GMT")
            .unwrap()
            .with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_average_of_empty_set_is_zero() {
        let average = average_rating(&[]);
        assert_eq!(average, 0.0);
        assert!(!average.is_nan());
    }

    #[test]
    fn test_average_rating() {
        let reviews = vec![sample(1, 1, 5), sample(2, 1, 4), sample(3, 1, 3)];
        assert!((average_rating(&reviews) - 4.0).abs() < f64::EPSILON);

        let reviews = vec![sample(1, 1, 5), sample(2, 1, 4)];
        assert!((average_rating(&reviews) - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parses_backend_timestamp() {
        let review: Review = serde_json::from_value(json!({
            "id": 11,
            "productId": 3,
            "rating": 4,
            "review": "barang bagus, pengiriman cepat",
            "tanggal": "Tue, 01 Apr 2025 10:55:59 GMT"
        }))
        .unwrap();

        assert_eq!(review.posted_at.year(), 2025);
        assert_eq!(review.posted_at.month(), 4);
        assert_eq!(review.posted_at.hour(), 10);
        assert_eq!(review.body, "barang bagus, pengiriman cepat");
    }

    #[test]
    fn test_invalid_timestamp_is_rejected() {
        let result = serde_json::from_value::<Review>(json!({
            "id": 11, "productId": 3, "rating": 4, "review": "", "tanggal": "yesterday"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_rating_out_of_range_fails_validation() {
        assert!(sample(1, 1, 0).validate().is_err());
        assert!(sample(1, 1, 6).validate().is_err());
        assert!(sample(1, 1, 1).validate().is_ok());
    }
}
