use axum::{
    extract::{rejection::QueryRejection, Query},
    http::StatusCode,
    Json,
};
use contracts::dashboards::d001_sales_report::{SalesBucket, SalesEntry, SalesEntryDto, SalesQuery};

use crate::dashboards::d001_sales_report::service::{self, SalesServiceError};

/// GET /api/d001/sales?from=&to=&grain=&productIds=
pub async fn get_sales(
    query: Result<Query<SalesQuery>, QueryRejection>,
) -> Result<Json<Vec<SalesBucket>>, (StatusCode, String)> {
    let Query(query) = query.map_err(|e| {
        tracing::warn!("Rejected sales query: {}", e.body_text());
        (StatusCode::BAD_REQUEST, e.body_text())
    })?;

    match service::get_sales(query).await {
        Ok(buckets) => Ok(Json(buckets)),
        Err(e @ SalesServiceError::RangeTooLarge(_)) => {
            tracing::warn!("Rejected sales query: {}", e);
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e) => {
            tracing::error!("Failed to build sales report: {:#}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "internal error".into()))
        }
    }
}

/// POST /api/d001/sales/entries
pub async fn record_entry(
    Json(dto): Json<SalesEntryDto>,
) -> Result<(StatusCode, Json<SalesEntry>), (StatusCode, String)> {
    match service::record_entry(dto).await {
        Ok(entry) => Ok((StatusCode::CREATED, Json(entry))),
        Err(SalesServiceError::Validation(e)) => Err((StatusCode::BAD_REQUEST, e.to_string())),
        Err(e @ SalesServiceError::UnknownProduct(_)) => Err((StatusCode::NOT_FOUND, e.to_string())),
        Err(e @ SalesServiceError::RangeTooLarge(_)) => Err((StatusCode::BAD_REQUEST, e.to_string())),
        Err(SalesServiceError::Internal(e)) => {
            tracing::error!("Failed to record sales entry: {:#}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "internal error".into()))
        }
    }
}
