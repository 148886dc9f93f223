use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::date_bucket::{DateRange, Granularity};

/// Query of the sales report: `?from=yyyy-mm-dd&to=yyyy-mm-dd&grain=day&productIds=a,b`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub grain: Granularity,
    /// Empty means every product
    #[serde(rename = "productIds", default, with = "comma_separated")]
    pub product_ids: Vec<Uuid>,
}

impl SalesQuery {
    pub fn new(range: DateRange, grain: Granularity, product_ids: Vec<Uuid>) -> Self {
        Self {
            from: range.from,
            to: range.to,
            grain,
            product_ids,
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            from: self.from,
            to: self.to,
        }
    }
}

mod comma_separated {
    use serde::{Deserialize, Deserializer, Serializer};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(ids: &[Uuid], serializer: S) -> Result<S::Ok, S::Error> {
        let joined = ids.iter().map(Uuid::to_string).collect::<Vec<_>>().join(",");
        serializer.serialize_str(&joined)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Uuid>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Uuid::parse_str(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

/// One row of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesBucket {
    pub bucket: String,
    #[serde(rename = "totalAmount", default)]
    pub total_amount: i64,
    #[serde(rename = "totalQty", default)]
    pub total_qty: i64,
}

/// Measures of one bucket before they are attached to a key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Measures {
    pub quantity: i64,
    pub amount: i64,
}

/// Walk the buckets of `[from, to]` and attach measures to each key.
///
/// Keys for which `measures_for` has nothing get zeros, so the output always
/// holds exactly one bucket per unit step, in chronological order.
pub fn assemble_buckets<F>(
    from: NaiveDate,
    to: NaiveDate,
    grain: Granularity,
    mut measures_for: F,
) -> Vec<SalesBucket>
where
    F: FnMut(&str) -> Option<Measures>,
{
    crate::shared::date_bucket::bucket_sequence(from, to, grain)
        .map(|marker| {
            let measures = measures_for(&marker.key).unwrap_or_default();
            SalesBucket {
                bucket: marker.key,
                total_amount: measures.amount,
                total_qty: measures.quantity,
            }
        })
        .collect()
}

/// Synthetic report used when no real data source is configured.
///
/// `random` must return values in `[0, 1)`. Quantity is `floor(r * 10)` and
/// amount is `quantity * (1000 + floor(r * 9000))`.
pub fn mock_buckets<R>(from: NaiveDate, to: NaiveDate, grain: Granularity, mut random: R) -> Vec<SalesBucket>
where
    R: FnMut() -> f64,
{
    assemble_buckets(from, to, grain, |_| {
        let quantity = (random() * 10.0).floor() as i64;
        let unit_price = 1000 + (random() * 9000.0).floor() as i64;
        Some(Measures {
            quantity,
            amount: quantity * unit_price,
        })
    })
}

/// Footer row of the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SalesTotals {
    pub total_amount: i64,
    pub total_qty: i64,
}

impl SalesTotals {
    /// Sums clamp at the `i64` bounds
    pub fn from_buckets(buckets: &[SalesBucket]) -> Self {
        buckets.iter().fold(Self::default(), |acc, b| Self {
            total_amount: acc.total_amount.saturating_add(b.total_amount),
            total_qty: acc.total_qty.saturating_add(b.total_qty),
        })
    }
}

/// Which measure the report emphasizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureMode {
    #[default]
    Amount,
    Quantity,
}

impl MeasureMode {
    pub fn label(&self) -> &'static str {
        match self {
            MeasureMode::Amount => "금액",
            MeasureMode::Quantity => "수량",
        }
    }

    pub fn value_of(&self, bucket: &SalesBucket) -> i64 {
        match self {
            MeasureMode::Amount => bucket.total_amount,
            MeasureMode::Quantity => bucket.total_qty,
        }
    }
}

// ============================================================================
// Recorded sales
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SalesEntryError {
    #[error("quantity must be at least 1")]
    QuantityTooSmall,
    #[error("amount must not be negative")]
    NegativeAmount,
}

/// Body of `POST /api/d001/sales/entries`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesEntryDto {
    #[serde(rename = "productId")]
    pub product_id: Uuid,
    #[serde(rename = "soldOn")]
    pub sold_on: NaiveDate,
    pub quantity: i64,
    pub amount: i64,
}

impl SalesEntryDto {
    pub fn validate(&self) -> Result<(), SalesEntryError> {
        if self.quantity < 1 {
            return Err(SalesEntryError::QuantityTooSmall);
        }
        if self.amount < 0 {
            return Err(SalesEntryError::NegativeAmount);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesEntry {
    pub id: Uuid,
    #[serde(rename = "productId")]
    pub product_id: Uuid,
    #[serde(rename = "soldOn")]
    pub sold_on: NaiveDate,
    pub quantity: i64,
    pub amount: i64,
}
