use anyhow::Result;
use async_trait::async_trait;
use contracts::dashboards::d001_sales_report::{
    assemble_buckets, mock_buckets, Measures, SalesBucket, SalesQuery,
};
use once_cell::sync::OnceCell;
use rand::Rng;
use std::collections::HashMap;

use super::repository;
use crate::shared::config::SalesSourceKind;

/// Where the report numbers come from.
///
/// Implementations return one bucket per unit step of `[from, to]`, in order.
#[async_trait]
pub trait SalesSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_measures(&self, query: &SalesQuery) -> Result<Vec<SalesBucket>>;
}

/// SQL aggregation over `p001_sales_entry`
pub struct DatabaseSalesSource;

#[async_trait]
impl SalesSource for DatabaseSalesSource {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn fetch_measures(&self, query: &SalesQuery) -> Result<Vec<SalesBucket>> {
        let rows = repository::aggregate(query.from, query.to, query.grain, &query.product_ids).await?;
        let by_bucket: HashMap<String, Measures> = rows
            .into_iter()
            .map(|row| {
                (
                    row.bucket,
                    Measures {
                        quantity: row.total_qty,
                        amount: row.total_amount,
                    },
                )
            })
            .collect();

        Ok(assemble_buckets(query.from, query.to, query.grain, |key| {
            by_bucket.get(key).copied()
        }))
    }
}

/// Random numbers in the shape of real data
pub struct MockSalesSource;

impl MockSalesSource {
    fn generate(query: &SalesQuery) -> Vec<SalesBucket> {
        let mut rng = rand::thread_rng();
        mock_buckets(query.from, query.to, query.grain, || rng.gen::<f64>())
    }
}

#[async_trait]
impl SalesSource for MockSalesSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_measures(&self, query: &SalesQuery) -> Result<Vec<SalesBucket>> {
        Ok(Self::generate(query))
    }
}

static SALES_SOURCE: OnceCell<Box<dyn SalesSource>> = OnceCell::new();

pub fn create(kind: SalesSourceKind) -> Box<dyn SalesSource> {
    match kind {
        SalesSourceKind::Database => Box::new(DatabaseSalesSource),
        SalesSourceKind::Mock => Box::new(MockSalesSource),
    }
}

/// Select the process-wide source once at startup
pub fn initialize(kind: SalesSourceKind) -> Result<()> {
    let source = create(kind);
    tracing::info!("Sales report source: {}", source.name());
    SALES_SOURCE
        .set(source)
        .map_err(|_| anyhow::anyhow!("Sales source is already initialized"))
}

pub fn get_source() -> Result<&'static dyn SalesSource> {
    SALES_SOURCE
        .get()
        .map(|source| source.as_ref())
        .ok_or_else(|| anyhow::anyhow!("Sales source has not been initialized"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::shared::date_bucket::Granularity;

    fn query(grain: Granularity) -> SalesQuery {
        SalesQuery {
            from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            grain,
            product_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_mock_source_shape() {
        let source = create(SalesSourceKind::Mock);
        assert_eq!(source.name(), "mock");

        let months = source.fetch_measures(&query(Granularity::Month)).await.unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].bucket, "2024-01");
        assert_eq!(months[11].bucket, "2024-12");
        assert!(months.iter().all(|b| (0..=9).contains(&b.total_qty)));

        let years = source.fetch_measures(&query(Granularity::Year)).await.unwrap();
        assert_eq!(years.len(), 1);
    }
}
