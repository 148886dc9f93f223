use contracts::domain::a001_product::aggregate::Product;
use gloo_net::http::{Request, RequestBuilder};
use uuid::Uuid;
use web_sys::FormData;

use crate::shared::api_utils::{api_url, response_error};
use crate::shared::data_source::ProductSubmission;
use crate::system::auth::api::bearer;

const BASE: &str = "/api/a001/product";

fn with_auth(builder: RequestBuilder) -> RequestBuilder {
    match bearer() {
        Some(value) => builder.header("Authorization", &value),
        None => builder,
    }
}

/// Multipart body of the product form
///
/// Field names are part of the API: `title`, `description`, `price`,
/// one `images` part per new file and one `existingUrls[]` per kept image.
fn form_data(submission: &ProductSubmission) -> Result<FormData, String> {
    let fd = FormData::new().map_err(|e| format!("FormData: {:?}", e))?;
    let append = |name: &str, value: &str| {
        fd.append_with_str(name, value)
            .map_err(|e| format!("FormData {}: {:?}", name, e))
    };
    append("title", &submission.form.title)?;
    append("description", &submission.form.description)?;
    append("price", submission.form.price.trim())?;
    for url in &submission.existing_urls {
        append("existingUrls[]", url)?;
    }
    for file in &submission.files {
        fd.append_with_blob_and_filename("images", file, &file.name())
            .map_err(|e| format!("FormData images: {:?}", e))?;
    }
    Ok(fd)
}

pub async fn fetch_products() -> Result<Vec<Product>, String> {
    let response = with_auth(Request::get(&api_url(BASE)))
        .send()
        .await
        .map_err(|e| format!("Failed to fetch: {}", e))?;
    if !response.ok() {
        return Err(response_error(response, "상품 목록을 불러오지 못했습니다.").await);
    }
    response
        .json::<Vec<Product>>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn create_product(submission: &ProductSubmission) -> Result<Product, String> {
    let body = form_data(submission)?;
    let response = with_auth(Request::post(&api_url(BASE)))
        .body(body)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    if !response.ok() {
        return Err(response_error(response, "상품을 등록하지 못했습니다.").await);
    }
    response
        .json::<Product>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn update_product(id: Uuid, submission: &ProductSubmission) -> Result<Product, String> {
    let body = form_data(submission)?;
    let response = with_auth(Request::put(&api_url(&format!("{}/{}", BASE, id))))
        .body(body)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    if !response.ok() {
        return Err(response_error(response, "상품을 수정하지 못했습니다.").await);
    }
    response
        .json::<Product>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn delete_product(id: Uuid) -> Result<(), String> {
    let response = with_auth(Request::delete(&api_url(&format!("{}/{}", BASE, id))))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    if !response.ok() {
        return Err(response_error(response, "상품을 삭제하지 못했습니다.").await);
    }
    Ok(())
}
