use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

/// Body for create and full replace. Every field is optional so that missing
/// data is reported by validation rather than a deserialization failure.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub price: Option<f64>,
    pub status: Option<bool>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    pub thumbnails: Option<String>,
}

/// Listing payload: the paginated store result passed through unchanged, plus
/// the derived navigation links.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListPayload {
    pub products: Vec<Product>,
    pub total_pages: u64,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
    pub page: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}
