use contracts::dashboards::d001_sales_report::{SalesBucket, SalesQuery};
use gloo_net::http::Request;

use crate::shared::api_utils::{api_url, response_error};
use crate::system::auth::api::bearer;

/// `GET /api/d001/sales?from=..&to=..&grain=..&productIds=a,b`
pub async fn fetch_sales(query: &SalesQuery) -> Result<Vec<SalesBucket>, String> {
    let qs = serde_qs::to_string(query).map_err(|e| format!("Failed to build query: {}", e))?;
    let mut request = Request::get(&api_url(&format!("/api/d001/sales?{}", qs)));
    if let Some(value) = bearer() {
        request = request.header("Authorization", &value);
    }

    let response = request
        .send()
        .await
        .map_err(|e| format!("Failed to fetch: {}", e))?;
    if !response.ok() {
        return Err(response_error(response, "판매 내역을 불러오지 못했습니다.").await);
    }
    response
        .json::<Vec<SalesBucket>>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
