use contracts::dashboards::d001_sales_report::{
    SalesBucket, SalesEntry, SalesEntryDto, SalesEntryError, SalesQuery,
};

use super::{repository, source};
use crate::domain::a001_product;

/// About ten years of daily rows
pub const MAX_REPORT_BUCKETS: u64 = 3660;

#[derive(Debug, thiserror::Error)]
pub enum SalesServiceError {
    #[error(transparent)]
    Validation(#[from] SalesEntryError),
    #[error("product {0} not found")]
    UnknownProduct(uuid::Uuid),
    #[error("range spans {0} buckets, at most {} are allowed", MAX_REPORT_BUCKETS)]
    RangeTooLarge(u64),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Report rows for the query, from the configured source.
/// A reversed range yields no rows.
pub async fn get_sales(query: SalesQuery) -> Result<Vec<SalesBucket>, SalesServiceError> {
    if query.from > query.to {
        return Ok(Vec::new());
    }
    let count = query.grain.bucket_count(query.from, query.to);
    if count > MAX_REPORT_BUCKETS {
        return Err(SalesServiceError::RangeTooLarge(count));
    }
    let source = source::get_source()?;
    let buckets = source.fetch_measures(&query).await?;
    tracing::debug!(
        "Sales {}..{} by {}: {} buckets from {}",
        query.from,
        query.to,
        query.grain,
        buckets.len(),
        source.name()
    );
    Ok(buckets)
}

pub async fn record_entry(dto: SalesEntryDto) -> Result<SalesEntry, SalesServiceError> {
    dto.validate()?;

    if a001_product::service::get_by_id(dto.product_id).await?.is_none() {
        return Err(SalesServiceError::UnknownProduct(dto.product_id));
    }

    let entry = SalesEntry {
        id: uuid::Uuid::new_v4(),
        product_id: dto.product_id,
        sold_on: dto.sold_on,
        quantity: dto.quantity,
        amount: dto.amount,
    };
    repository::insert_entry(&entry).await?;
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use contracts::shared::date_bucket::Granularity;

    fn query(from: NaiveDate, to: NaiveDate, grain: Granularity) -> SalesQuery {
        SalesQuery {
            from,
            to,
            grain,
            product_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_unbounded_day_range_is_rejected() {
        let from = NaiveDate::from_ymd_opt(1, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();

        let err = get_sales(query(from, to, Granularity::Day)).await.unwrap_err();
        assert!(matches!(err, SalesServiceError::RangeTooLarge(3_652_059)));
        assert!(matches!(
            get_sales(query(from, to, Granularity::Year)).await,
            Err(SalesServiceError::RangeTooLarge(9999))
        ));

        // a century by year is within the cap; whatever happens next is not a range error
        let century_from = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let by_year = get_sales(query(century_from, to.with_year(2099).unwrap(), Granularity::Year)).await;
        assert!(!matches!(by_year, Err(SalesServiceError::RangeTooLarge(_))));
    }
}
