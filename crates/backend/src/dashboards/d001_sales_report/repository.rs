use anyhow::Result;
use chrono::{NaiveDate, Utc};
use contracts::dashboards::d001_sales_report::SalesEntry;
use contracts::shared::date_bucket::{Granularity, ISO_DATE_FORMAT};
use sea_orm::{ConnectionTrait, DatabaseBackend, FromQueryResult, Statement, Value};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

/// Sums of one bucket as returned by SQL
#[derive(Debug, Clone, FromQueryResult)]
pub struct BucketAggregation {
    pub bucket: String,
    pub total_qty: i64,
    pub total_amount: i64,
}

/// Group recorded sales of `[from, to]` by the bucket key.
///
/// `sold_on` is stored as `yyyy-mm-dd`, so the bucket key is its prefix of
/// `granularity.key_len()` characters. An empty `product_ids` selects every product.
pub async fn aggregate(
    from: NaiveDate,
    to: NaiveDate,
    granularity: Granularity,
    product_ids: &[Uuid],
) -> Result<Vec<BucketAggregation>> {
    let mut sql = String::from(
        r#"
        SELECT
            substr(sold_on, 1, ?) AS bucket,
            CAST(COALESCE(SUM(quantity), 0) AS INTEGER) AS total_qty,
            CAST(COALESCE(SUM(amount), 0) AS INTEGER) AS total_amount
        FROM p001_sales_entry
        WHERE sold_on >= ? AND sold_on <= ?
        "#,
    );

    let mut values: Vec<Value> = vec![
        (granularity.key_len() as i32).into(),
        from.format(ISO_DATE_FORMAT).to_string().into(),
        to.format(ISO_DATE_FORMAT).to_string().into(),
    ];

    if !product_ids.is_empty() {
        let placeholders = vec!["?"; product_ids.len()].join(", ");
        sql.push_str(&format!(" AND product_id IN ({})", placeholders));
        values.extend(product_ids.iter().map(|id| Value::from(id.to_string())));
    }

    sql.push_str(" GROUP BY bucket ORDER BY bucket");

    let stmt = Statement::from_sql_and_values(DatabaseBackend::Sqlite, &sql, values);
    let results = BucketAggregation::find_by_statement(stmt)
        .all(get_connection())
        .await?;

    Ok(results)
}

pub async fn insert_entry(entry: &SalesEntry) -> Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO p001_sales_entry (id, product_id, sold_on, quantity, amount, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            [
                entry.id.to_string().into(),
                entry.product_id.to_string().into(),
                entry.sold_on.format(ISO_DATE_FORMAT).to_string().into(),
                entry.quantity.into(),
                entry.amount.into(),
                Utc::now().to_rfc3339().into(),
            ],
        ))
        .await?;
    Ok(())
}
