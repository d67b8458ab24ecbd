//! Sentiment records and their whole-percent summary.
//!
//! The backend classifies reviews server-side and returns raw bucket counts per
//! product. The client only aggregates and labels them.

use crate::domain::product::ProductId;
use crate::domain::Validate;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SentimentRecord {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    #[serde(rename = "sentiment_positive")]
    pub positive: f64,
    #[serde(rename = "sentiment_neutral")]
    pub neutral: f64,
    #[serde(rename = "sentiment_negative")]
    pub negative: f64,
}

impl SentimentRecord {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.positive + self.neutral + self.negative
    }
}

impl Validate for SentimentRecord {
    fn validate(&self) -> Result<(), String> {
        for (bucket, value) in [
            ("sentiment_positive", self.positive),
            ("sentiment_neutral", self.neutral),
            ("sentiment_negative", self.negative),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "sentiment for product {}: {bucket} must be a non-negative number, got {value}",
                    self.product_id
                ));
            }
        }
        Ok(())
    }
}

/// The bucket with the largest share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentimentTone {
    Positive,
    Neutral,
    Negative,
}

impl SentimentTone {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Positive => "green",
            Self::Neutral => "gray",
            Self::Negative => "red",
        }
    }
}

/// Whole-percent sentiment distribution for one product.
///
/// Percentages are rounded with the largest-remainder method so they always
/// add up to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentSummary {
    pub positive_percent: u8,
    pub neutral_percent: u8,
    pub negative_percent: u8,
    pub dominant: SentimentTone,
}

impl SentimentSummary {
    /// Summarises the records belonging to `product`, summing duplicates.
    ///
    /// Returns `None` when there is nothing to summarise (no matching record, or
    /// every bucket is zero).
    #[must_use]
    pub fn for_product(records: &[SentimentRecord], product: ProductId) -> Option<Self> {
        let (positive, neutral, negative) = records
            .iter()
            .filter(|record| record.product_id == product)
            .fold((0.0, 0.0, 0.0), |(p, u, n), record| {
                (p + record.positive, u + record.neutral, n + record.negative)
            });
        Self::from_counts(positive, neutral, negative)
    }

    #[must_use]
    pub fn from_counts(positive: f64, neutral: f64, negative: f64) -> Option<Self> {
        let total = positive + neutral + negative;
        if !total.is_finite() || total <= 0.0 {
            return None;
        }

        let counts = [positive, neutral, negative];
        let exact = counts.map(|count| count * 100.0 / total);
        let mut percents = exact.map(|share| share.floor().clamp(0.0, 100.0) as u8);
        let assigned: u32 = percents.iter().map(|&p| u32::from(p)).sum();
        let missing = 100u32.saturating_sub(assigned) as usize;

        // Bucket order doubles as the tie-break: positive, neutral, negative.
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| {
            let rem_a = exact[a] - exact[a].floor();
            let rem_b = exact[b] - exact[b].floor();
            rem_b.total_cmp(&rem_a).then(a.cmp(&b))
        });
        for &bucket in order.iter().take(missing) {
            percents[bucket] += 1;
        }

        let dominant = if positive >= neutral && positive >= negative {
            SentimentTone::Positive
        } else if neutral >= negative {
            SentimentTone::Neutral
        } else {
            SentimentTone::Negative
        };

        Some(Self {
            positive_percent: percents[0],
            neutral_percent: percents[1],
            negative_percent: percents[2],
            dominant,
        })
    }

    #[must_use]
    pub fn percent_of(&self, tone: SentimentTone) -> u8 {
        match tone {
            SentimentTone::Positive => self.positive_percent,
            SentimentTone::Neutral => self.neutral_percent,
            SentimentTone::Negative => self.negative_percent,
        }
    }
}

#[cfg(test)]
pub(crate) fn record(product: u64, positive: f64, neutral: f64, negative: f64) -> SentimentRecord {
    SentimentRecord {
        product_id: ProductId(product),
        positive,
        neutral,
        negative,
    }
}
